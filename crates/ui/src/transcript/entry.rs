use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// Stable identifier of a transcript record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
    /// Informational notices (welcome, mode switches, upload status)
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// Where a record is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Placeholder waiting for the answer service
    Pending,
    /// Answer held in memory, being exposed tick by tick
    Revealing,
    Complete,
    Error,
    /// Interrupted by the user; only used when terminal phases are marked
    Cancelled,
}

impl Phase {
    /// Pending or revealing: the record still belongs to an active request
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Phase::Pending | Phase::Revealing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Pending => "pending",
            Phase::Revealing => "revealing",
            Phase::Complete => "complete",
            Phase::Error => "error",
            Phase::Cancelled => "cancelled",
        }
    }
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub phase: Phase,
    /// Position in the transcript, assigned by the store on insert
    pub created_seq: u64,
    pub created_at: DateTime<Utc>,
}

impl MessageRecord {
    pub fn new(role: Role, content: impl Into<String>, phase: Phase) -> Self {
        Self { id: MessageId::new(), role, content: content.into(), phase, created_seq: 0, created_at: Utc::now() }
    }

    /// Empty assistant record waiting for its answer
    pub fn assistant_placeholder() -> Self {
        Self::new(Role::Assistant, String::new(), Phase::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ids_are_unique() {
        let a = MessageId::new();
        let b = MessageId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), a.as_uuid().to_string());
    }

    #[test]
    fn test_phase_in_flight() {
        assert!(Phase::Pending.is_in_flight());
        assert!(Phase::Revealing.is_in_flight());
        assert!(!Phase::Complete.is_in_flight());
        assert!(!Phase::Error.is_in_flight());
        assert!(!Phase::Cancelled.is_in_flight());
    }

    #[test]
    fn test_assistant_placeholder() {
        let placeholder = MessageRecord::assistant_placeholder();
        assert_eq!((placeholder.role, placeholder.phase), (Role::Assistant, Phase::Pending));
        assert!(placeholder.content.is_empty());
        assert_eq!(placeholder.created_seq, 0);
    }
}
