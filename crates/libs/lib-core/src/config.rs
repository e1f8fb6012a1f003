//! # Application Configuration
//!
//! This module manages client configuration loaded from environment
//! variables. All configuration is validated on startup to fail fast if
//! misconfigured.
//!
//! ## Global Config Access
//!
//! Use [`core_config()`] to access the global configuration instance:
//!
//! ```rust,no_run
//! use lib_core::config::core_config;
//!
//! let config = core_config();
//! let base = &config.api_base_url;
//! ```
//!
//! The config must be initialized once at application startup using
//! [`init_config()`]. Components that want an injected configuration (tests,
//! embedders) can construct a [`Config`] directly instead.

use std::path::PathBuf;
use std::sync::OnceLock;

use lib_utils::envs::{get_env_or, get_env_parse_or};

use crate::error::{AppError, Result};

/// Client configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the backend API server
    pub api_base_url: String,

    /// Directory holding the durable session records
    pub data_dir: PathBuf,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,

    /// Seconds between expiry-monitor checks
    pub expiry_check_interval_secs: u64,

    /// Safety window in seconds: the session is proactively cleared once
    /// `exp - now` falls to this value or below
    pub expiry_window_secs: i64,

    /// Seconds an unsubscribed cache slot is retained before eviction
    pub cache_grace_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable has a default suitable for local development; the
    /// deployment environment overrides them.
    pub fn from_env() -> Result<Self> {
        let api_base_url = get_env_or("EVENTRA_API_URL", "http://127.0.0.1:3001");
        let data_dir = PathBuf::from(get_env_or("EVENTRA_DATA_DIR", "data"));
        let request_timeout_secs = get_env_parse_or("EVENTRA_TIMEOUT_SECS", 10)?;
        let expiry_check_interval_secs = get_env_parse_or("EVENTRA_EXPIRY_CHECK_SECS", 30)?;
        let expiry_window_secs = get_env_parse_or("EVENTRA_EXPIRY_WINDOW_SECS", 300)?;
        let cache_grace_secs = get_env_parse_or("EVENTRA_CACHE_GRACE_SECS", 30)?;

        Ok(Self {
            api_base_url,
            data_dir,
            request_timeout_secs,
            expiry_check_interval_secs,
            expiry_window_secs,
            cache_grace_secs,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(AppError::Config(
                "EVENTRA_API_URL must be an http(s) URL".to_string(),
            ));
        }

        if self.request_timeout_secs < 1 || self.request_timeout_secs > 120 {
            return Err(AppError::Config(
                "EVENTRA_TIMEOUT_SECS must be between 1 and 120".to_string(),
            ));
        }

        if self.expiry_check_interval_secs < 5 || self.expiry_check_interval_secs > 300 {
            return Err(AppError::Config(
                "EVENTRA_EXPIRY_CHECK_SECS must be between 5 and 300".to_string(),
            ));
        }

        if self.expiry_window_secs < self.expiry_check_interval_secs as i64 {
            return Err(AppError::Config(
                "EVENTRA_EXPIRY_WINDOW_SECS must be at least the check interval".to_string(),
            ));
        }

        if self.cache_grace_secs > 600 {
            return Err(AppError::Config(
                "EVENTRA_CACHE_GRACE_SECS must be at most 600".to_string(),
            ));
        }

        Ok(())
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration.
///
/// Loads a `.env` file if present, reads the environment, validates, and
/// publishes the config. Call once at application startup, before anything
/// that needs configuration runs.
///
/// # Errors
///
/// Returns an error if environment values fail to parse, validation fails,
/// or the config has already been initialized.
pub fn init_config() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| AppError::Config("Config has already been initialized".to_string()))
}

/// Get a reference to the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet. This ensures
/// configuration is always available when accessed.
pub fn core_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Config must be initialized with init_config() before use")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            api_base_url: "http://127.0.0.1:3001".to_string(),
            data_dir: PathBuf::from("data"),
            request_timeout_secs: 10,
            expiry_check_interval_secs: 30,
            expiry_window_secs: 300,
            cache_grace_secs: 30,
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = base_config();
        config.api_base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_window_below_interval() {
        let mut config = base_config();
        config.expiry_window_secs = 10;
        assert!(config.validate().is_err());
    }
}
