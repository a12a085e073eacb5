use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Base directory name for parlor data under the user's home
pub const PARLOR_DIR_NAME: &str = ".parlor";

/// Filename for the configuration file
pub const CONFIG_FILE: &str = "config.toml";

/// Subdirectory for rolling log files
pub const LOGS_DIR: &str = "logs";

/// Filename holding the persisted conversation id
pub const CONVERSATION_FILE: &str = "conversation_id";

/// Represents the `~/.parlor/` directory layout and provides path resolution
#[derive(Debug, Clone)]
pub struct ParlorDir {
    root: PathBuf,
}

impl ParlorDir {
    /// Create a layout rooted at the given directory (the `.parlor` folder itself)
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    /// Resolve `~/.parlor`
    pub fn from_home() -> Result<Self> {
        let home =
            dirs::home_dir().ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;
        Ok(Self::new(home.join(PARLOR_DIR_NAME)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `~/.parlor/config.toml`
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// `~/.parlor/logs/`
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIR)
    }

    /// `~/.parlor/conversation_id`
    pub fn conversation_file(&self) -> PathBuf {
        self.root.join(CONVERSATION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parlor_dir_paths() {
        let dir = ParlorDir::new("/home/user/.parlor");
        assert_eq!(dir.root(), Path::new("/home/user/.parlor"));
        assert_eq!(dir.config_file(), PathBuf::from("/home/user/.parlor/config.toml"));
        assert_eq!(dir.logs_dir(), PathBuf::from("/home/user/.parlor/logs"));
        assert_eq!(dir.conversation_file(), PathBuf::from("/home/user/.parlor/conversation_id"));
    }
}
