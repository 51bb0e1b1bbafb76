//! Configuration module for rpcwatch
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`RPCWATCH_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use rpcwatch::config::RpcWatchConfig;
//!
//! let config = RpcWatchConfig::default();
//! assert_eq!(config.poller.interval_seconds, 30);
//!
//! let toml = r#"
//! [api]
//! base_url = "https://monitor.example.com"
//! "#;
//! let config: RpcWatchConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.api.base_url, "https://monitor.example.com");
//! ```

pub mod api;
pub mod error;
pub mod logging;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};

// Re-export PollerConfig from health module
pub use crate::health::PollerConfig;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Unified configuration for rpcwatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RpcWatchConfig {
    /// Backend connection settings
    pub api: ApiConfig,
    /// Polling session settings
    pub poller: PollerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl RpcWatchConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (previous values are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("RPCWATCH_API_URL") {
            if !url.is_empty() {
                self.api.base_url = url;
            }
        }
        if let Ok(token) = std::env::var("RPCWATCH_TOKEN") {
            if !token.is_empty() {
                self.api.token = Some(token);
            }
        }
        if let Ok(path) = std::env::var("RPCWATCH_TOKEN_FILE") {
            if !path.is_empty() {
                self.api.token_file = Some(PathBuf::from(path));
            }
        }

        if let Ok(interval) = std::env::var("RPCWATCH_POLL_INTERVAL") {
            if let Ok(secs) = interval.parse() {
                self.poller.interval_seconds = secs;
            }
        }

        if let Ok(level) = std::env::var("RPCWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("RPCWATCH_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Validation {
                field: "api.base_url".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation {
                field: "api.base_url".to_string(),
                message: format!("'{}' must start with http:// or https://", base_url),
            });
        }

        if self.api.timeout_seconds == Some(0) {
            return Err(ConfigError::Validation {
                field: "api.timeout_seconds".to_string(),
                message: "timeout must be non-zero when set".to_string(),
            });
        }

        if self.poller.interval_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "poller.interval_seconds".to_string(),
                message: "interval must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}
