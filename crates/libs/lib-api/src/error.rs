//! # API Error Taxonomy
//!
//! Every failure the request pipeline can produce, kept distinct so screens
//! can phrase them differently: a network failure is "try again", an HTTP
//! error carries the backend's own message, a parse failure is a client or
//! contract bug.
//!
//! Nothing here is retried automatically; retry policy belongs to callers.

use shared::ErrorResponse;
use thiserror::Error;

/// Convenience type alias for `Result<T, ApiError>`.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// A failed API operation.
///
/// Errors propagate unmodified through the response cache to subscribing
/// screens. `Clone` because a cached error fans out to every subscriber of
/// the slot that produced it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Transport-level failure; no response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response. The body is carried verbatim for display.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A 2xx response body that could not be interpreted as the expected
    /// structure.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// The backend's own error message, when the response body carries the
    /// standard `{ "error": ... }` shape.
    pub fn backend_message(&self) -> Option<String> {
        match self {
            ApiError::Http { body, .. } => serde_json::from_str::<ErrorResponse>(body)
                .ok()
                .map(|e| e.error),
            _ => None,
        }
    }

    /// True for responses the UI should answer with "please log in again".
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ApiError::Http { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_extraction() {
        let err = ApiError::Http {
            status: 409,
            body: r#"{"error":"Email already registered"}"#.to_string(),
        };
        assert_eq!(err.backend_message().as_deref(), Some("Email already registered"));

        let plain = ApiError::Http { status: 502, body: "Bad Gateway".to_string() };
        assert_eq!(plain.backend_message(), None);
    }
}
