use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for parlor-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types shared by the parlor crates
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Conversation identity errors
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Answer service, knowledge-base registry or ingestion failures
    #[error("service error: {0}")]
    Service(String),

    /// Parse/serialization errors
    #[error("parse error: {0}")]
    Parse(String),

    /// Input rejected before any work was done
    #[error("validation error: {0}")]
    Validation(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error came from an outbound collaborator.
    pub fn is_service(&self) -> bool {
        matches!(self, Error::Service(_))
    }
}

/// Conversation identity errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Persisted or supplied id does not match `<millis>_<n>`
    #[error("invalid conversation id: {0}")]
    InvalidConversationId(String),

    /// State file could not be read or written
    #[error("state file {path}: {reason}")]
    StateFile { path: PathBuf, reason: String },
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Service("answer service returned 502 Bad Gateway".to_string());
        assert_eq!(err.to_string(), "service error: answer service returned 502 Bad Gateway");

        let err = Error::Validation("knowledge base name is empty".to_string());
        assert_eq!(err.to_string(), "validation error: knowledge base name is empty");

        let err = Error::Other("boom".to_string());
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_session_error_display() {
        let err = SessionError::InvalidConversationId("abc".to_string());
        assert_eq!(err.to_string(), "invalid conversation id: abc");

        let err = SessionError::StateFile { path: PathBuf::from("/tmp/id"), reason: "denied".to_string() };
        assert_eq!(err.to_string(), "state file /tmp/id: denied");
    }

    #[test]
    fn test_error_conversions() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));

        let err: Error = SessionError::InvalidConversationId("x".to_string()).into();
        assert!(matches!(err, Error::Session(_)));
        assert!(!err.is_service());

        assert!(Error::Service("down".to_string()).is_service());
    }
}
