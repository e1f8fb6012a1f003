//! # Core Library
//!
//! Configuration, error handling, and the session lifecycle (store,
//! durable storage, expiration monitor) for the client core.

pub mod config;
pub mod error;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use session::{ExpiryMonitor, Session, SessionStore};
