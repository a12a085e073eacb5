//! Simulated streaming.
//!
//! The answer service returns the whole text at once; the scheduler exposes it
//! a few characters per tick so it reads as if it were arriving token by token.
//! Pacing and chunk sizes are injected, so tests can use a fixed seed and a zero
//! interval together with tokio's paused clock.

mod chunking;
mod cursor;

pub use chunking::{ChunkStrategy, FixedChunks, RandomChunks};
pub use cursor::RevealCursor;

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::transcript::MessageId;
use parlor_core::RevealConfig;

/// Handle to one running reveal
#[derive(Debug)]
pub struct RevealHandle {
    target: MessageId,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl RevealHandle {
    pub fn target(&self) -> MessageId {
        self.target
    }

    /// Stop ticking. Once this returns no further callback runs. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The reveal ran to completion or was cancelled
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Drives reveals on the tokio runtime.
///
/// Only one reveal should run at a time; the lifecycle controller guarantees
/// this by cancelling before it starts another.
pub struct RevealScheduler {
    interval: Duration,
    strategy: Box<dyn ChunkStrategy>,
}

impl RevealScheduler {
    pub fn new(interval: Duration, strategy: Box<dyn ChunkStrategy>) -> Self {
        Self { interval, strategy }
    }

    pub fn from_config(config: &RevealConfig) -> Self {
        Self::new(
            config.interval(),
            Box::new(RandomChunks::new(config.min_chunk, config.max_chunk, config.seed)),
        )
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Begin revealing `full_text` for `target`.
    ///
    /// `on_tick` receives each growing prefix. The tick that exposes the last
    /// character calls `on_done` with the full text instead, exactly once.
    /// Must be called from within a tokio runtime.
    pub fn start<T, D>(&mut self, target: MessageId, full_text: String, mut on_tick: T, on_done: D) -> RevealHandle
    where
        T: FnMut(MessageId, String) + Send + 'static,
        D: FnOnce(MessageId, String) + Send + 'static,
    {
        let token = CancellationToken::new();
        let mut strategy = self.strategy.fork();
        let interval = self.interval;
        let cancelled = token.clone();

        let task = tokio::spawn(async move {
            let mut cursor = RevealCursor::new(full_text);
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => return,
                    _ = pause(interval) => {}
                }

                let step = strategy.next_chunk(cursor.remaining());
                let partial = cursor.advance(step).to_string();
                if cursor.is_complete() {
                    on_done(target, cursor.into_full_text());
                    return;
                }
                on_tick(target, partial);
            }
        });

        RevealHandle { target, token, task }
    }
}

async fn pause(interval: Duration) {
    if interval.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[derive(Debug, PartialEq)]
    enum Seen {
        Tick(String),
        Done(String),
    }

    fn run(scheduler: &mut RevealScheduler, text: &str) -> (RevealHandle, mpsc::UnboundedReceiver<Seen>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let done_tx = tx.clone();
        let handle = scheduler.start(
            MessageId::new(),
            text.to_string(),
            move |_, partial| {
                let _ = tx.send(Seen::Tick(partial));
            },
            move |_, full| {
                let _ = done_tx.send(Seen::Done(full));
            },
        );
        (handle, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_grows_then_completes_once() {
        let mut scheduler = RevealScheduler::new(Duration::from_millis(50), Box::new(RandomChunks::typing(Some(11))));
        let text = "hi there, have a coffee";
        let (handle, mut rx) = run(&mut scheduler, text);

        let mut last_len = 0;
        let mut done = Vec::new();
        while let Some(seen) = rx.recv().await {
            match seen {
                Seen::Tick(partial) => {
                    assert!(text.starts_with(&partial));
                    assert!(partial.len() > last_len);
                    assert!(partial.len() < text.len());
                    last_len = partial.len();
                }
                Seen::Done(full) => done.push(full),
            }
        }

        assert_eq!(done, vec![text.to_string()]);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_follow_interval() {
        let mut scheduler = RevealScheduler::new(Duration::from_millis(50), Box::new(FixedChunks(2)));
        let started = tokio::time::Instant::now();
        let (_handle, mut rx) = run(&mut scheduler, "abcdef");

        assert_eq!(rx.recv().await, Some(Seen::Tick("ab".to_string())));
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(started.elapsed() < Duration::from_millis(100));
        assert_eq!(rx.recv().await, Some(Seen::Tick("abcd".to_string())));
        assert_eq!(rx.recv().await, Some(Seen::Done("abcdef".to_string())));
        assert!(started.elapsed() >= Duration::from_millis(150));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_zero_interval_runs_without_timers() {
        let mut scheduler = RevealScheduler::new(Duration::ZERO, Box::new(FixedChunks(1)));
        let (_handle, mut rx) = run(&mut scheduler, "abc");

        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            seen.push(event);
        }
        assert_eq!(
            seen,
            vec![
                Seen::Tick("a".to_string()),
                Seen::Tick("ab".to_string()),
                Seen::Done("abc".to_string())
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_text_completes_on_first_tick() {
        let mut scheduler = RevealScheduler::new(Duration::from_millis(50), Box::new(FixedChunks(3)));
        let (_handle, mut rx) = run(&mut scheduler, "");

        assert_eq!(rx.recv().await, Some(Seen::Done(String::new())));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks_and_is_idempotent() {
        let mut scheduler = RevealScheduler::new(Duration::from_millis(50), Box::new(FixedChunks(1)));
        let (handle, mut rx) = run(&mut scheduler, "a long answer that will not finish");

        assert_eq!(rx.recv().await, Some(Seen::Tick("a".to_string())));
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(rx.recv().await, None);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_seeded_reveals_are_reproducible() {
        async fn ticks(seed: u64) -> Vec<String> {
            let mut scheduler =
                RevealScheduler::new(Duration::from_millis(50), Box::new(RandomChunks::typing(Some(seed))));
            let (_handle, mut rx) = run(&mut scheduler, "reproducible pacing matters in tests");
            let mut out = Vec::new();
            while let Some(seen) = rx.recv().await {
                if let Seen::Tick(partial) = seen {
                    out.push(partial);
                }
            }
            out
        }

        assert_eq!(ticks(5).await, ticks(5).await);
    }

    #[test]
    fn test_from_config() {
        let config = RevealConfig { interval_ms: 20, min_chunk: 2, max_chunk: 2, seed: Some(1) };
        let scheduler = RevealScheduler::from_config(&config);
        assert_eq!(scheduler.interval(), Duration::from_millis(20));
    }
}
