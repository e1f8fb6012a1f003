//! # Utilities Library
//!
//! Shared utility functions for base64url decoding, environment variables,
//! and epoch time arithmetic.

pub mod b64;
pub mod envs;
pub mod time;

// Re-export commonly used functions
pub use b64::{b64u_decode, b64u_decode_to_string, b64u_encode};
pub use envs::{get_env, get_env_or, get_env_parse, get_env_parse_or};
pub use time::{epoch_to_utc, now_epoch_s};
