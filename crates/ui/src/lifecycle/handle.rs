use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::reveal::RevealHandle;
use crate::transcript::MessageId;

/// The one in-flight request. Its presence is what makes the controller busy.
#[derive(Debug)]
pub struct ActiveRequest {
    pub target: MessageId,
    abort: CancellationToken,
    request: JoinHandle<()>,
    reveal: Option<RevealHandle>,
}

impl ActiveRequest {
    pub fn new(target: MessageId, abort: CancellationToken, request: JoinHandle<()>) -> Self {
        Self { target, abort, request, reveal: None }
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }

    pub fn attach_reveal(&mut self, reveal: RevealHandle) {
        debug_assert_eq!(reveal.target(), self.target);
        self.reveal = Some(reveal);
    }

    /// Abort the network call and stop any reveal
    pub fn abort(&self) {
        self.abort.cancel();
        self.request.abort();
        if let Some(reveal) = &self.reveal {
            reveal.cancel();
        }
    }
}
