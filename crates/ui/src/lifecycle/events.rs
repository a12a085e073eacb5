use crate::transcript::MessageId;
use parlor_core::Result;

/// Failure text shown in place of an answer when the service fails
pub const FAILURE_TEXT: &str = "Request failed, please try again later.";

/// Asynchronous results delivered back to the controller.
///
/// Every event names the assistant record it belongs to; the controller drops
/// events whose target is no longer the active request.
#[derive(Debug)]
pub enum LifecycleEvent {
    /// The answer service finished (not sent when the request was aborted)
    AnswerResolved { target: MessageId, result: Result<String> },
    /// The reveal exposed a longer prefix
    RevealTick { target: MessageId, partial: String },
    /// The reveal exposed the whole answer
    RevealDone { target: MessageId, full: String },
}

impl LifecycleEvent {
    pub fn target(&self) -> MessageId {
        match self {
            LifecycleEvent::AnswerResolved { target, .. }
            | LifecycleEvent::RevealTick { target, .. }
            | LifecycleEvent::RevealDone { target, .. } => *target,
        }
    }
}

/// Controller state, derived from the active request handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    /// Waiting for the answer service
    Pending,
    Revealing,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Pending => "pending",
            LifecycleState::Revealing => "revealing",
        }
    }
}

/// How the most recent request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Complete,
    Cancelled,
    Errored,
}
