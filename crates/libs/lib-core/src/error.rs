//! # Centralized Error Handling
//!
//! Application-wide error type [`AppError`] for the client core, following
//! the `thiserror` pattern used across the workspace.
//!
//! ## Error Categories
//!
//! - [`Config`](AppError::Config) - startup configuration problems; fail fast
//! - [`Storage`](AppError::Storage) - durable session record read/write failures
//! - [`Decode`](AppError::Decode) - bearer credential decode failures; aborts
//!   session establishment and never overwrites prior session state

use lib_auth::DecodeError;
use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type for the client core.
///
/// Each variant includes a descriptive `String` context where the source
/// error alone would not say what was being attempted.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Durable storage error (reading or writing session records).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Bearer credential decode error.
    #[error("Credential decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Convert `lib_utils::envs::Error` to `AppError`.
impl From<lib_utils::envs::Error> for AppError {
    fn from(err: lib_utils::envs::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
