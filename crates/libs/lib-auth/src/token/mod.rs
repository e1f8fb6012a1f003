//! # Bearer Token Claims
//!
//! Decodes the claim set out of a compact three-segment bearer credential.
//!
//! The credential has the shape `<header>.<claims>.<signature>` where the
//! middle segment is a base64url-encoded JSON object. Only the middle
//! segment is read; the signature is **not** verified here — verification is
//! the backend's job, and the client never holds the signing secret. A
//! token that decodes cleanly is still only as trustworthy as the channel
//! it arrived on.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Claim set carried in the credential's middle segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user id)
    pub sub: i64,
    /// Username
    pub username: String,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
}

/// Reasons a credential failed to decode.
///
/// None of these are retryable: the caller must abort session
/// establishment and surface a generic authentication failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("credential is not a three-segment token")]
    Malformed,
    #[error("claims segment is not valid base64url")]
    Base64,
    #[error("claims segment is not valid JSON")]
    Json,
    #[error("claims segment lacks a usable `{0}` claim")]
    MissingClaim(&'static str),
}

/// Decode the claim set from a compact bearer credential.
///
/// # Errors
///
/// Fails with [`DecodeError`] when the token does not have exactly three
/// dot-separated segments, the middle segment is not base64url, the decoded
/// bytes are not a JSON object, or any of `username`/`exp`/`sub` is absent
/// or of the wrong type.
pub fn decode_claims(token: &str) -> Result<Claims, DecodeError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(claims), Some(_sig), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(DecodeError::Malformed);
    };

    let json = lib_utils::b64u_decode_to_string(claims).map_err(|_| DecodeError::Base64)?;
    let value: Value = serde_json::from_str(&json).map_err(|_| DecodeError::Json)?;

    let username = value
        .get("username")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingClaim("username"))?
        .to_string();
    let exp = value
        .get("exp")
        .and_then(Value::as_i64)
        .ok_or(DecodeError::MissingClaim("exp"))?;
    let sub = value
        .get("sub")
        .and_then(Value::as_i64)
        .ok_or(DecodeError::MissingClaim("sub"))?;

    Ok(Claims { sub, username, exp })
}
