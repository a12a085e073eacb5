use crate::lifecycle::LifecycleState;
use crate::transcript::MessageId;
use parlor_core::ConversationId;
use parlor_providers::KnowledgeBaseId;

/// What the primary button does right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    Send,
    Interrupt,
}

impl PrimaryAction {
    pub fn label(&self) -> &'static str {
        match self {
            PrimaryAction::Send => "Send",
            PrimaryAction::Interrupt => "Interrupt",
        }
    }
}

/// Enabled/disabled state of the user-facing controls, derived from the
/// lifecycle state on every read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub primary: PrimaryAction,
    pub can_copy: bool,
    pub can_regenerate: bool,
    pub input_focused: bool,
}

impl Affordances {
    pub fn for_state(state: LifecycleState) -> Self {
        let idle = state == LifecycleState::Idle;
        Self {
            primary: if idle { PrimaryAction::Send } else { PrimaryAction::Interrupt },
            can_copy: idle,
            can_regenerate: idle,
            input_focused: idle,
        }
    }
}

/// A user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Send(String),
    Interrupt,
    /// Send or interrupt, whichever the primary button currently shows
    Primary(String),
    Copy(MessageId),
    Regenerate(MessageId),
    CopyLast,
    RegenerateLast,
    NewConversation,
    SetKnowledgeMode(bool),
    SelectKnowledgeBase(KnowledgeBaseId),
}

/// What an intent did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    Started(MessageId),
    Interrupted,
    Copied(String),
    Regenerated(MessageId),
    ConversationReset(ConversationId),
    KnowledgeModeChanged(bool),
    KnowledgeBaseSelected(KnowledgeBaseId),
    /// The control was disabled or the intent had nothing to act on
    Ignored,
}
