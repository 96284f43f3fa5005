//! Client configuration.
//!
//! Defaults, overridable from the environment and then by the builder
//! methods (the CLI applies its flags last).

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::error::ErrorCategory;

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Connect timeout used when nothing else is configured.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid base URL '{0}': must start with http:// or https://")]
    InvalidUrl(String),

    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },

    #[error("No session file location: set BIOCHAT_SESSION_FILE")]
    NoSessionFile,
}

impl ConfigError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Settings for one client instance.
///
/// # Example
///
/// ```
/// use biochat::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_base_url("https://chat.example.com/")
///     .with_request_timeout_secs(10);
/// assert_eq!(config.base_url, "https://chat.example.com");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root, without trailing slash (env: BIOCHAT_URL)
    pub base_url: String,
    /// Where the session id is kept between runs (env: BIOCHAT_SESSION_FILE)
    pub session_file: Option<PathBuf>,
    /// Connect timeout in seconds (env: BIOCHAT_CONNECT_TIMEOUT)
    pub request_timeout_secs: u64,
    /// Log filter directive (env: BIOCHAT_LOG)
    pub log_filter: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_file: dirs::config_dir().map(|dir| dir.join("biochat").join("session")),
            request_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            log_filter: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by any `BIOCHAT_*` variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = env_var("BIOCHAT_URL") {
            config = config.with_base_url(url);
        }
        if let Some(path) = env_var("BIOCHAT_SESSION_FILE") {
            config = config.with_session_file(path);
        }
        if let Some(secs) = env_var("BIOCHAT_CONNECT_TIMEOUT") {
            let secs = secs
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: "BIOCHAT_CONNECT_TIMEOUT",
                    value: secs,
                })?;
            config = config.with_request_timeout_secs(secs);
        }
        if let Some(filter) = env_var("BIOCHAT_LOG") {
            config = config.with_log_filter(filter);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the backend URL; a trailing `/` is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Session file path, or an error if none could be determined.
    pub fn session_file(&self) -> Result<&PathBuf, ConfigError> {
        self.session_file.as_ref().ok_or(ConfigError::NoSessionFile)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.base_url.clone()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "request_timeout_secs",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
