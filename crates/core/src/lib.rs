pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod session;

pub use config::{
    BackendKind, Config, ConfigError, KnowledgeConfig, LifecycleConfig, RevealConfig, ServiceConfig, SessionConfig,
};
pub use error::{Error, Result, SessionError};
pub use layout::ParlorDir;
pub use session::{ConversationId, IdentityStore};
