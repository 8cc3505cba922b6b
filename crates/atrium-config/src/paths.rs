//! File system paths for persisted client state.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Config file name under the base directory.
const CONFIG_FILE_NAME: &str = "config.json";
/// Session file name under the base directory.
const SESSION_FILE_NAME: &str = "session.json";
/// Log file name under the base directory.
const LOG_FILE_NAME: &str = "console.log";

/// Manages file system paths for the console client.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for client files (~/.atrium)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.atrium`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(".atrium"),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.atrium).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.atrium/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE_NAME)
    }

    /// Get the session file path (~/.atrium/session.json).
    pub fn session_file(&self) -> PathBuf {
        self.base_dir.join(SESSION_FILE_NAME)
    }

    /// Get the log file path (~/.atrium/console.log).
    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join(LOG_FILE_NAME)
    }

    /// Ensure the base directory exists.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_dir() {
        let paths = Paths::with_base_dir(PathBuf::from("/tmp/atrium-test"));
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/atrium-test/config.json"));
        assert_eq!(paths.session_file(), PathBuf::from("/tmp/atrium-test/session.json"));
    }

    #[test]
    fn test_ensure_dirs_creates_base() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = Paths::with_base_dir(tmp.path().join("nested").join("dir"));
        paths.ensure_dirs().unwrap();
        assert!(paths.base_dir().exists());
    }
}
