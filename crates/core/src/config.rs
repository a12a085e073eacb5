use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// Which backend answers questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Remote HTTP answer service (default)
    #[default]
    Http,
    /// Scripted responses, no network
    Mock,
}

impl BackendKind {
    pub const VALUES: &[BackendKind] = &[BackendKind::Http, BackendKind::Mock];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Http => "http",
            BackendKind::Mock => "mock",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(BackendKind::Http),
            "mock" => Ok(BackendKind::Mock),
            _ => Err(crate::Error::Config(ConfigError::InvalidBackend(s.to_string()).to_string())),
        }
    }
}

/// `[service]`: where the answer service, registry and ingestion endpoints live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub base_url: String,
    pub backend: BackendKind,
    /// TOML script for the mock backend
    pub mock_script: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:8080".to_string(), backend: BackendKind::Http, mock_script: None }
    }
}

/// `[reveal]`: pacing of the simulated streaming
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Milliseconds between ticks; 0 yields to the runtime between ticks
    pub interval_ms: u64,
    pub min_chunk: usize,
    pub max_chunk: usize,
    /// Fixed seed for chunk sizes
    pub seed: Option<u64>,
}

impl RevealConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self { interval_ms: 50, min_chunk: 1, max_chunk: 4, seed: None }
    }
}

/// `[knowledge]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KnowledgeConfig {
    /// Knowledge-base mode at startup
    pub enabled: bool,
    pub default_base: String,
    /// Tag attached to uploaded documents
    pub upload_tag: String,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self { enabled: false, default_base: "coffee_collection".to_string(), upload_tag: "general".to_string() }
    }
}

/// `[session]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Where the conversation id is persisted; defaults to `~/.parlor/conversation_id`
    pub state_file: Option<PathBuf>,
}

/// `[lifecycle]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LifecycleConfig {
    /// Finalize interrupted turns as `cancelled` and failed turns as `error`
    /// instead of `complete`
    pub mark_terminal_phases: bool,
}

/// `[logging.file]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileLoggingConfig {
    pub enabled: bool,
    pub level: String,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self { enabled: false, level: "debug".to_string() }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// Characters of question/answer text kept in log previews
    pub preview_length: usize,
    pub file: FileLoggingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
            preview_length: 120,
            file: FileLoggingConfig::default(),
        }
    }
}

/// Root configuration structure for config.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub service: ServiceConfig,
    pub reveal: RevealConfig,
    pub knowledge: KnowledgeConfig,
    pub session: SessionConfig,
    pub lifecycle: LifecycleConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let base = &self.service.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base.clone()).into());
        }

        let RevealConfig { min_chunk, max_chunk, .. } = self.reveal;
        if min_chunk == 0 || min_chunk > max_chunk {
            return Err(ConfigError::InvalidChunkRange { min: min_chunk, max: max_chunk }.into());
        }

        if crate::logging::LogFormat::parse_str(&self.logging.format).is_none() {
            return Err(ConfigError::InvalidLogFormat(self.logging.format.clone()).into());
        }

        if self.knowledge.default_base.trim().is_empty() {
            return Err(ConfigError::EmptyDefaultBase.into());
        }

        Ok(())
    }

    /// Get example configuration (as a string)
    pub fn example() -> &'static str {
        r#"# Parlor Configuration Example
# Every section is optional; the values below are the defaults.

[service]
# Answer service, knowledge-base registry and upload endpoints share this base
base_url = "http://localhost:8080"
# Backend: "http" or "mock"
backend = "http"
# Responses for the mock backend (optional)
# mock_script = "/path/to/responses.toml"

[reveal]
# Milliseconds between reveal ticks
interval_ms = 50
# Characters revealed per tick are drawn from min_chunk..=max_chunk
min_chunk = 1
max_chunk = 4
# Fixed seed for reproducible chunking (optional)
# seed = 42

[knowledge]
# Start in knowledge-base mode
enabled = false
default_base = "coffee_collection"
upload_tag = "general"

[session]
# state_file = "/path/to/conversation_id"

[lifecycle]
# Mark interrupted answers as cancelled and failed ones as errors
mark_terminal_phases = false

[logging]
level = "warn"
# "pretty", "json" or "compact"
format = "pretty"
preview_length = 120

[logging.file]
enabled = false
level = "debug"
"#
    }
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid backend: {0}")]
    InvalidBackend(String),

    #[error("base_url must start with http:// or https://: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid chunk range: min_chunk={min}, max_chunk={max}")]
    InvalidChunkRange { min: usize, max: usize },

    #[error("invalid log format: {0}")]
    InvalidLogFormat(String),

    #[error("knowledge.default_base cannot be empty")]
    EmptyDefaultBase,

    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlParse(err.to_string())
    }
}
