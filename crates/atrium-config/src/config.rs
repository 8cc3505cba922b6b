//! Configuration management for the console client.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default API origin (can be overridden at compile time via ATRIUM_API_ORIGIN env var).
pub const DEFAULT_API_ORIGIN: &str = match option_env!("ATRIUM_API_ORIGIN") {
    Some(origin) => origin,
    None => "https://api.atrium.app",
};

/// Default API version prefix (can be overridden at compile time via ATRIUM_API_PREFIX env var).
pub const DEFAULT_API_PREFIX: &str = match option_env!("ATRIUM_API_PREFIX") {
    Some(prefix) => prefix,
    None => "/api/v1",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Main console client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Backend API origin, scheme + host (+ optional port).
    #[serde(default = "default_api_origin")]
    pub api_origin: String,
    /// API version prefix inserted between origin and resource paths.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_api_origin() -> String {
    DEFAULT_API_ORIGIN.to_string()
}

fn default_api_prefix() -> String {
    DEFAULT_API_PREFIX.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api_origin: DEFAULT_API_ORIGIN.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from the config file, falling back to defaults.
    /// Environment variables override values from the file.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the config file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let config_path = paths.config_file();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("ATRIUM_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Ok(origin) = std::env::var("ATRIUM_API_ORIGIN") {
            self.api_origin = origin;
        }
        if let Ok(prefix) = std::env::var("ATRIUM_API_PREFIX") {
            self.api_prefix = prefix;
        }
    }

    /// Get the API origin as a parsed URL.
    pub fn api_origin(&self) -> CoreResult<Url> {
        Url::parse(&self.api_origin).map_err(CoreError::from)
    }
}
