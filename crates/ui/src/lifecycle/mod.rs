//! Request lifecycle.
//!
//! One assistant turn moves `Idle -> Pending -> Revealing -> Idle`, with
//! cancellation and network failure as the other ways back to `Idle`. The
//! controller owns the transcript and the only [`ActiveRequest`]; asynchronous
//! work (the answer call and the reveal ticks) runs on spawned tasks and
//! reports back through a channel drained by [`Controller::next_event`] and
//! [`Controller::handle_event`].

mod events;
mod handle;

pub use events::{FAILURE_TEXT, LifecycleEvent, LifecycleState, Outcome};
pub use handle::ActiveRequest;

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::context::SessionContext;
use crate::reveal::RevealScheduler;
use crate::transcript::{MessageId, MessageRecord, Phase, Role, TranscriptChange, TranscriptStore};
use parlor_core::logging::{DEFAULT_PREVIEW_LENGTH, preview};
use parlor_core::{Config, ConversationId, LifecycleConfig, Result};
use parlor_providers::AnswerService;

/// Phases written when a turn ends without a normal reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalPhases {
    pub cancelled: Phase,
    pub failed: Phase,
}

impl TerminalPhases {
    /// Interrupted and failed turns look finished
    pub const UNMARKED: TerminalPhases = TerminalPhases { cancelled: Phase::Complete, failed: Phase::Complete };

    pub const MARKED: TerminalPhases = TerminalPhases { cancelled: Phase::Cancelled, failed: Phase::Error };

    pub fn from_config(config: &LifecycleConfig) -> Self {
        if config.mark_terminal_phases { Self::MARKED } else { Self::UNMARKED }
    }
}

impl Default for TerminalPhases {
    fn default() -> Self {
        Self::UNMARKED
    }
}

/// Single-flight request lifecycle controller
pub struct Controller {
    store: TranscriptStore,
    context: SessionContext,
    answers: Arc<dyn AnswerService>,
    reveal: RevealScheduler,
    phases: TerminalPhases,
    active: Option<ActiveRequest>,
    last_outcome: Option<Outcome>,
    events_tx: mpsc::UnboundedSender<LifecycleEvent>,
    events_rx: mpsc::UnboundedReceiver<LifecycleEvent>,
    preview_length: usize,
}

impl Controller {
    pub fn new(answers: Arc<dyn AnswerService>, context: SessionContext, reveal: RevealScheduler) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            store: TranscriptStore::new(),
            context,
            answers,
            reveal,
            phases: TerminalPhases::default(),
            active: None,
            last_outcome: None,
            events_tx,
            events_rx,
            preview_length: DEFAULT_PREVIEW_LENGTH,
        }
    }

    pub fn from_config(config: &Config, answers: Arc<dyn AnswerService>, context: SessionContext) -> Self {
        let mut controller = Self::new(answers, context, RevealScheduler::from_config(&config.reveal))
            .with_terminal_phases(TerminalPhases::from_config(&config.lifecycle));
        controller.preview_length = config.logging.preview_length;
        controller
    }

    pub fn with_terminal_phases(mut self, phases: TerminalPhases) -> Self {
        self.phases = phases;
        self
    }

    pub fn state(&self) -> LifecycleState {
        match &self.active {
            None => LifecycleState::Idle,
            Some(active) if active.is_revealing() => LifecycleState::Revealing,
            Some(_) => LifecycleState::Pending,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Assistant record of the in-flight request
    pub fn active_target(&self) -> Option<MessageId> {
        self.active.as_ref().map(|active| active.target)
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    pub fn transcript(&self) -> &TranscriptStore {
        &self.store
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<TranscriptChange> {
        self.store.subscribe()
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SessionContext {
        &mut self.context
    }

    /// Submit user text. Appends the user record and a pending assistant
    /// placeholder, then asks the answer service.
    ///
    /// Returns the placeholder id, or `None` when the text is blank or a
    /// request is already in flight (nothing is changed in either case).
    pub fn start(&mut self, text: &str) -> Option<MessageId> {
        if !self.is_idle() {
            debug!(state = self.state().as_str(), "start ignored while busy");
            return None;
        }

        let question = text.trim();
        if question.is_empty() {
            return None;
        }

        self.store.append(Role::User, question, Phase::Complete);
        Some(self.dispatch(question.to_string()))
    }

    /// Interrupt the active request. The assistant record keeps whatever was
    /// revealed so far. Returns `false` when idle.
    pub fn cancel(&mut self) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };

        active.abort();
        self.store.update(active.target, None, Some(self.phases.cancelled));
        self.last_outcome = Some(Outcome::Cancelled);
        info!(record = %active.target, "request cancelled");
        true
    }

    /// Re-ask the question behind an assistant record: everything after the
    /// nearest earlier user record is removed and a fresh placeholder follows it.
    ///
    /// No-op (returns `None`) while busy, for non-assistant records, or when no
    /// earlier user record exists.
    pub fn regenerate(&mut self, id: MessageId) -> Option<MessageId> {
        if !self.is_idle() {
            debug!(state = self.state().as_str(), "regenerate ignored while busy");
            return None;
        }

        if self.store.get(id)?.role != Role::Assistant {
            return None;
        }

        let Some(user_id) = self.store.find_nearest_prior_user(id) else {
            debug!(record = %id, "regenerate ignored: no earlier user message");
            return None;
        };
        let question = self.store.get(user_id)?.content.clone();

        let removed = self.store.truncate_after(user_id);
        debug!(removed, "regenerating answer");
        Some(self.dispatch(question))
    }

    /// Content of a record, for the clipboard. Never mutates the transcript.
    pub fn copy(&self, id: MessageId) -> Option<String> {
        self.store.get(id).map(|record| record.content.clone())
    }

    /// Append an informational system record
    pub fn announce(&mut self, text: impl Into<String>) -> MessageId {
        self.store.append(Role::System, text, Phase::Complete)
    }

    /// Cancel anything in flight, switch to a fresh conversation id and clear
    /// the transcript. If the new id cannot be saved the transcript is kept.
    pub fn new_conversation(&mut self) -> Result<ConversationId> {
        self.cancel();
        let id = self.context.reset_conversation()?;
        self.store.clear();
        Ok(id)
    }

    /// Wait for the next asynchronous result
    pub async fn next_event(&mut self) -> Option<LifecycleEvent> {
        self.events_rx.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<LifecycleEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Apply an asynchronous result. Events for anything but the active
    /// request are dropped.
    pub fn handle_event(&mut self, event: LifecycleEvent) {
        let target = event.target();
        let revealing = match &self.active {
            Some(active) if active.target == target => active.is_revealing(),
            _ => {
                debug!(record = %target, "dropping event for inactive request");
                return;
            }
        };

        match event {
            LifecycleEvent::AnswerResolved { result: Ok(answer), .. } => {
                if revealing {
                    debug!(record = %target, "duplicate answer ignored");
                    return;
                }
                debug!(record = %target, answer = %preview(&answer, self.preview_length), "answer received");
                self.begin_reveal(target, answer);
            }
            LifecycleEvent::AnswerResolved { result: Err(err), .. } => {
                warn!(record = %target, error = %err, "answer request failed");
                self.store
                    .update(target, Some(FAILURE_TEXT.to_string()), Some(self.phases.failed));
                self.finish(Outcome::Errored);
            }
            LifecycleEvent::RevealTick { partial, .. } => {
                if revealing {
                    self.store.update(target, Some(partial), Some(Phase::Revealing));
                }
            }
            LifecycleEvent::RevealDone { full, .. } => {
                if revealing {
                    self.store.update(target, Some(full), Some(Phase::Complete));
                    self.finish(Outcome::Complete);
                }
            }
        }
    }

    /// Drive events until the active request ends
    pub async fn run_until_idle(&mut self) {
        while !self.is_idle() {
            let Some(event) = self.events_rx.recv().await else {
                break;
            };
            self.handle_event(event);
        }
    }

    fn dispatch(&mut self, question: String) -> MessageId {
        let target = self.store.push(MessageRecord::assistant_placeholder());
        let request = self.context.answer_request(question);
        debug!(
            record = %target,
            knowledge = request.is_knowledge(),
            question = %preview(&request.question, self.preview_length),
            "dispatching question"
        );

        let abort = CancellationToken::new();
        let aborted = abort.clone();
        let answers = Arc::clone(&self.answers);
        let tx = self.events_tx.clone();

        let task = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = aborted.cancelled() => {}
                result = answers.ask(request) => {
                    let _ = tx.send(LifecycleEvent::AnswerResolved { target, result });
                }
            }
        });

        self.active = Some(ActiveRequest::new(target, abort, task));
        target
    }

    fn begin_reveal(&mut self, target: MessageId, answer: String) {
        self.store.update(target, None, Some(Phase::Revealing));

        let tick_tx = self.events_tx.clone();
        let done_tx = self.events_tx.clone();
        let handle = self.reveal.start(
            target,
            answer,
            move |target, partial| {
                let _ = tick_tx.send(LifecycleEvent::RevealTick { target, partial });
            },
            move |target, full| {
                let _ = done_tx.send(LifecycleEvent::RevealDone { target, full });
            },
        );

        if let Some(active) = self.active.as_mut() {
            active.attach_reveal(handle);
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        if let Some(active) = self.active.take() {
            info!(record = %active.target, ?outcome, "request finished");
        }
        self.last_outcome = Some(outcome);
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.abort();
        }
    }
}
