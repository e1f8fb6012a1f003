//! # Session Lifecycle
//!
//! The authenticated session and everything that manages it:
//!
//! - [`Session`] - the identity held in memory and persisted storage
//! - [`SessionStore`] - the single owner of session state
//! - [`SessionStorage`] - durable key-value backend trait
//! - [`ExpiryMonitor`] - background proactive-expiry checks
//!
//! A session is either entirely absent or fully populated; nothing in this
//! module constructs or persists a partial one.

pub mod monitor;
pub mod storage;
pub mod store;

pub use monitor::{ExpiryMonitor, MonitorHandle};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use store::{SessionStore, SESSION_EXP_KEY, SESSION_KEY};

use serde::{Deserialize, Serialize};

/// The authenticated identity.
///
/// Field names serialize in camelCase so the durable record matches the
/// wire shape the rest of the platform reads
/// (`{ username, role, accessToken, refreshToken, exp, sub }`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    pub role: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry, Unix epoch seconds (the token's `exp` claim).
    pub exp: i64,
    /// Subject id (the token's `sub` claim).
    pub sub: i64,
}

impl Session {
    /// Seconds until expiry relative to `now` (negative once past expiry).
    pub fn remaining_secs(&self, now_epoch_s: i64) -> i64 {
        self.exp - now_epoch_s
    }
}
