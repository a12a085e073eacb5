use parlor_providers::{AnswerMode, AnswerService, MockResponse, ScriptedAnswerService};
use parlor_ui::{
    Controller, FAILURE_TEXT, FixedChunks, LifecycleState, MessageId, Outcome, Phase, RandomChunks, RevealScheduler,
    Role, SessionContext, TerminalPhases,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const TICK: Duration = Duration::from_millis(50);

fn controller_with(responses: Vec<MockResponse>, chunk: usize) -> (Controller, Arc<ScriptedAnswerService>) {
    let service = Arc::new(ScriptedAnswerService::new(responses));
    let answers: Arc<dyn AnswerService> = service.clone();
    let reveal = RevealScheduler::new(TICK, Box::new(FixedChunks(chunk)));
    (Controller::new(answers, SessionContext::ephemeral(), reveal), service)
}

/// Apply everything already delivered without waiting
fn drain(controller: &mut Controller) {
    while let Some(event) = controller.try_next_event() {
        controller.handle_event(event);
    }
}

fn shape(controller: &Controller) -> Vec<(Role, String, Phase)> {
    controller
        .transcript()
        .records()
        .map(|r| (r.role, r.content.clone(), r.phase))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_hello_end_to_end() {
    let (mut controller, service) =
        controller_with(vec![MockResponse::text("hi there").with_latency(Duration::from_millis(200))], 3);

    controller.start("hello").unwrap();
    assert_eq!(
        shape(&controller),
        vec![
            (Role::User, "hello".to_string(), Phase::Complete),
            (Role::Assistant, String::new(), Phase::Pending),
        ]
    );

    controller.run_until_idle().await;
    assert_eq!(
        shape(&controller),
        vec![
            (Role::User, "hello".to_string(), Phase::Complete),
            (Role::Assistant, "hi there".to_string(), Phase::Complete),
        ]
    );
    assert_eq!(controller.last_outcome(), Some(Outcome::Complete));

    let requests = service.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].question, "hello");
    assert_eq!(requests[0].mode, AnswerMode::Plain);
}

#[tokio::test(start_paused = true)]
async fn test_start_appends_both_records_before_resolution() {
    let (mut controller, _) = controller_with(vec![MockResponse::text("later").with_latency(Duration::from_secs(1))], 2);

    for question in ["one", "two"] {
        let before = controller.transcript().len();
        let target = controller.start(question).unwrap();

        assert_eq!(controller.transcript().len(), before + 2);
        assert_eq!(controller.state(), LifecycleState::Pending);
        assert_eq!(controller.transcript().in_flight(), vec![target]);

        controller.run_until_idle().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_answer_leaves_empty_complete_record() {
    let (mut controller, _) = controller_with(vec![MockResponse::text("too late").with_latency(Duration::from_secs(1))], 2);

    let target = controller.start("x").unwrap();
    assert!(controller.cancel());
    assert_eq!(controller.state(), LifecycleState::Idle);

    tokio::time::sleep(Duration::from_secs(3)).await;
    drain(&mut controller);

    let record = controller.transcript().get(target).unwrap();
    assert_eq!(record.content, "");
    assert_eq!(record.phase, Phase::Complete);
    assert_eq!(controller.last_outcome(), Some(Outcome::Cancelled));
    assert!(!controller.cancel());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_while_revealing_freezes_prefix() {
    let (mut controller, _) = controller_with(vec![MockResponse::text("a reply long enough for many ticks")], 2);
    let target = controller.start("go").unwrap();

    loop {
        let event = controller.next_event().await.unwrap();
        controller.handle_event(event);
        let revealed = controller.transcript().get(target).unwrap().content.len();
        if controller.state() == LifecycleState::Revealing && revealed >= 6 {
            break;
        }
    }

    controller.cancel();
    let frozen = controller.transcript().get(target).unwrap().content.clone();
    assert!("a reply long enough for many ticks".starts_with(&frozen));

    tokio::time::sleep(TICK * 20).await;
    drain(&mut controller);

    let record = controller.transcript().get(target).unwrap();
    assert_eq!(record.content, frozen);
    assert_eq!(record.phase, Phase::Complete);
    assert!(controller.is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_marked_phases_distinguish_interrupted_and_failed() {
    let (controller, _) = controller_with(
        vec![
            MockResponse::text("slow").with_latency(Duration::from_secs(1)),
            MockResponse::error("503 Service Unavailable"),
        ],
        2,
    );
    let mut controller = controller.with_terminal_phases(TerminalPhases::MARKED);

    let interrupted = controller.start("first").unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    controller.cancel();
    assert_eq!(controller.transcript().get(interrupted).unwrap().phase, Phase::Cancelled);

    let failed = controller.start("second").unwrap();
    controller.run_until_idle().await;
    let record = controller.transcript().get(failed).unwrap();
    assert_eq!(record.phase, Phase::Error);
    assert_eq!(record.content, FAILURE_TEXT);
    assert!(controller.transcript().in_flight().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_regenerate_replaces_everything_after_prior_user() {
    let (mut controller, service) = controller_with(
        vec![MockResponse::text("first answer"), MockResponse::text("second answer"), MockResponse::text("again")],
        4,
    );

    controller.start("q1").unwrap();
    controller.run_until_idle().await;
    let first_answer = controller.transcript().last().unwrap().id;
    controller.start("q2").unwrap();
    controller.run_until_idle().await;
    assert_eq!(controller.transcript().len(), 4);

    let placeholder = controller.regenerate(first_answer).unwrap();
    let records: Vec<_> = controller.transcript().records().collect();
    assert_eq!(records.len(), 2);
    assert_eq!((records[0].role, records[0].content.as_str()), (Role::User, "q1"));
    assert_eq!(records[1].id, placeholder);
    assert_eq!(records[1].phase, Phase::Pending);
    assert!(controller.transcript().get(first_answer).is_none());

    controller.run_until_idle().await;
    assert_eq!(controller.transcript().last().unwrap().content, "again");
    assert_eq!(service.requests()[2].question, "q1");
}

#[tokio::test(start_paused = true)]
async fn test_regenerate_without_prior_user_changes_nothing() {
    let (mut controller, _) = controller_with(vec![MockResponse::text("unused")], 2);
    let notice = controller.announce("Welcome");
    let before = shape(&controller);

    assert!(controller.regenerate(notice).is_none());
    assert!(controller.regenerate(MessageId::new()).is_none());
    assert_eq!(shape(&controller), before);
    assert!(controller.is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_single_flight_holds_for_random_operation_sequences() {
    for seed in 0..8u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let (mut controller, _) = controller_with(
            vec![
                MockResponse::text("short").with_latency(Duration::from_millis(30)),
                MockResponse::text("a somewhat longer answer").with_latency(Duration::from_millis(120)),
                MockResponse::error("boom").with_latency(Duration::from_millis(60)),
            ],
            3,
        );

        for step in 0..120 {
            match rng.gen_range(0..4) {
                0 => {
                    controller.start(&format!("question {}", step));
                }
                1 => {
                    controller.cancel();
                }
                2 => {
                    if let Some(id) = controller.transcript().last_of_role(Role::Assistant).map(|r| r.id) {
                        controller.regenerate(id);
                    }
                }
                _ => {
                    tokio::time::sleep(Duration::from_millis(rng.gen_range(0..200))).await;
                    drain(&mut controller);
                }
            }

            let in_flight = controller.transcript().in_flight();
            assert!(in_flight.len() <= 1, "seed {} step {}: {:?}", seed, step, in_flight);
            match controller.active_target() {
                Some(target) => assert_eq!(in_flight, vec![target]),
                None => assert!(in_flight.is_empty()),
            }
        }

        controller.cancel();
        assert!(controller.transcript().in_flight().is_empty());
    }
}

#[tokio::test(start_paused = true)]
async fn test_reveal_prefixes_grow_until_done() {
    let full = "Brew at 93°C for four minutes, then press.".to_string();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let done_tx = tx.clone();

    let mut scheduler = RevealScheduler::new(TICK, Box::new(RandomChunks::new(1, 4, Some(11))));
    let _handle = scheduler.start(
        MessageId::new(),
        full.clone(),
        move |_, partial| {
            let _ = tx.send((false, partial));
        },
        move |_, text| {
            let _ = done_tx.send((true, text));
        },
    );

    let mut previous = 0;
    let mut ticks = 0;
    loop {
        let (done, text) = rx.recv().await.unwrap();
        assert!(full.starts_with(&text));
        assert!(text.len() >= previous);
        previous = text.len();
        if done {
            assert_eq!(text, full);
            break;
        }
        assert!(text.chars().count() < full.chars().count());
        ticks += 1;
    }

    let chars = full.chars().count();
    assert!(ticks >= chars / 4 - 1 && ticks < chars);

    tokio::time::sleep(TICK * 10).await;
    assert!(rx.try_recv().is_err());
}
