//! # Time Utilities
//!
//! Epoch-second helpers for token expiry arithmetic using chrono.

use chrono::{DateTime, Utc};

/// Current Unix time in whole seconds.
pub fn now_epoch_s() -> i64 {
    Utc::now().timestamp()
}

/// Convert epoch seconds to a UTC datetime, if representable.
pub fn epoch_to_utc(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_to_utc() {
        let dt = epoch_to_utc(1_999_999_999).unwrap();
        assert_eq!(dt.timestamp(), 1_999_999_999);
    }
}
