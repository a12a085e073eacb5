//! Conversation identity.
//!
//! A conversation id is sent with every answer request so the service can keep
//! per-conversation memory. It survives restarts through [`IdentityStore`] and
//! is only replaced when the user starts a new conversation.

use rand::Rng;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SessionError};
use crate::logging::sanitize_path;

/// Upper bound (exclusive) of the random suffix
const SUFFIX_RANGE: u32 = 1_000_000;

/// Conversation identifier in the form `<unix-millis>_<n>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationId(String);

impl ConversationId {
    /// Generate an id from the current time and a random suffix
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix = rand::thread_rng().gen_range(0..SUFFIX_RANGE);
        Self(format!("{}_{}", millis, suffix))
    }

    /// Parse and validate a persisted id
    pub fn parse(value: &str) -> std::result::Result<Self, SessionError> {
        let value = value.trim();
        let invalid = || SessionError::InvalidConversationId(value.to_string());

        let (millis, suffix) = value.split_once('_').ok_or_else(invalid)?;
        let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if !digits(millis) || !digits(suffix) {
            return Err(invalid());
        }
        if !matches!(suffix.parse::<u32>(), Ok(n) if n < SUFFIX_RANGE) {
            return Err(invalid());
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for ConversationId {
    type Error = SessionError;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Single-value persistent store for the current conversation id
#[derive(Debug, Clone)]
pub struct IdentityStore {
    path: Option<PathBuf>,
    current: ConversationId,
}

impl IdentityStore {
    /// Load the persisted id, or generate and persist a fresh one.
    ///
    /// A file holding something that is not a conversation id is replaced.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let existing = match fs::read_to_string(&path) {
            Ok(content) => match ConversationId::parse(&content) {
                Ok(id) => Some(id),
                Err(err) => {
                    tracing::warn!(path = %sanitize_path(&path), error = %err, "discarding persisted conversation id");
                    None
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                return Err(SessionError::StateFile { path, reason: err.to_string() }.into());
            }
        };

        let store = match existing {
            Some(current) => Self { path: Some(path), current },
            None => {
                let store = Self { path: Some(path), current: ConversationId::generate() };
                store.persist(&store.current)?;
                store
            }
        };

        tracing::debug!(conversation_id = %store.current, "conversation identity loaded");
        Ok(store)
    }

    /// A store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self { path: None, current: ConversationId::generate() }
    }

    pub fn current(&self) -> &ConversationId {
        &self.current
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replace the current id with a freshly generated one and persist it
    pub fn reset(&mut self) -> Result<&ConversationId> {
        let mut next = ConversationId::generate();
        while next == self.current {
            next = ConversationId::generate();
        }
        self.persist(&next)?;
        self.current = next;
        tracing::info!(conversation_id = %self.current, "started new conversation");
        Ok(&self.current)
    }

    fn persist(&self, id: &ConversationId) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let to_state_error =
            |err: std::io::Error| SessionError::StateFile { path: path.clone(), reason: err.to_string() };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(to_state_error)?;
        }
        fs::write(path, id.as_str()).map_err(to_state_error)?;
        Ok(())
    }
}
