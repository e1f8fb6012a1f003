//! # Base64url Encoding/Decoding
//!
//! URL-safe base64 without padding, the alphabet compact bearer credentials
//! use for their segments.

use base64::{engine::general_purpose, Engine as _};

/// Encode bytes to a base64url string (no padding).
pub fn b64u_encode(content: impl AsRef<[u8]>) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(content)
}

/// Decode a base64url string to bytes.
pub fn b64u_decode(b64u: &str) -> Result<Vec<u8>, Error> {
    general_purpose::URL_SAFE_NO_PAD
        .decode(b64u)
        .map_err(|_| Error::FailToB64uDecode)
}

/// Decode a base64url string to a UTF-8 string.
pub fn b64u_decode_to_string(b64u: &str) -> Result<String, Error> {
    b64u_decode(b64u)
        .and_then(|bytes| String::from_utf8(bytes).map_err(|_| Error::FailToB64uDecode))
}

// region:    --- Error
#[derive(Debug)]
pub enum Error {
    FailToB64uDecode,
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_b64u_round_trip() {
        let encoded = b64u_encode(r#"{"sub":42}"#);
        assert!(!encoded.contains('='));
        assert_eq!(b64u_decode_to_string(&encoded).unwrap(), r#"{"sub":42}"#);
    }

    #[test]
    fn test_b64u_decode_rejects_standard_alphabet() {
        // '+' and '/' belong to the standard alphabet, not base64url
        assert!(b64u_decode("a+b/").is_err());
    }
}
