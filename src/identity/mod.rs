//! Author identity handles
//!
//! An author is identified by an opaque 32-byte handle supplied by
//! whatever authorized the creation request. chirpdb never accepts a
//! free-form author string on the write path; callers hand over an
//! [`AuthorId`] they already hold.
//!
//! Key custody and signature verification live outside this crate. The
//! only generation facility provided here is [`AuthorId::generate`],
//! which fills a handle from the operating system RNG.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

/// Byte width of an author handle.
pub const AUTHOR_ID_LEN: usize = 32;

/// Opaque fixed-size identity handle of a record author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthorId([u8; AUTHOR_ID_LEN]);

impl AuthorId {
    /// Generates a fresh handle from the operating system RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; AUTHOR_ID_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wraps raw handle bytes.
    pub const fn from_bytes(bytes: [u8; AUTHOR_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw handle bytes.
    pub const fn as_bytes(&self) -> &[u8; AUTHOR_ID_LEN] {
        &self.0
    }
}

/// Handles render as URL-safe unpadded base64.
impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", URL_SAFE_NO_PAD.encode(self.0))
    }
}

/// Error parsing an author handle from its base64 form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAuthorIdError {
    /// The string is not valid base64.
    #[error("author handle is not valid base64: {0}")]
    InvalidEncoding(String),
    /// The decoded handle is not exactly 32 bytes.
    #[error("author handle must decode to {AUTHOR_ID_LEN} bytes, got {0}")]
    WrongLength(usize),
}

impl FromStr for AuthorId {
    type Err = ParseAuthorIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|e| ParseAuthorIdError::InvalidEncoding(e.to_string()))?;
        let bytes: [u8; AUTHOR_ID_LEN] = decoded
            .try_into()
            .map_err(|v: Vec<u8>| ParseAuthorIdError::WrongLength(v.len()))?;
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_produces_distinct_handles() {
        let a = AuthorId::generate();
        let b = AuthorId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_parse_roundtrip() {
        let id = AuthorId::generate();
        let encoded = id.to_string();
        let parsed: AuthorId = encoded.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_rejects_bad_base64() {
        let result = "not base64 at all!!!".parse::<AuthorId>();
        assert!(matches!(result, Err(ParseAuthorIdError::InvalidEncoding(_))));
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        let short = URL_SAFE_NO_PAD.encode([0u8; 16]);
        let result = short.parse::<AuthorId>();
        assert_eq!(result, Err(ParseAuthorIdError::WrongLength(16)));
    }

    #[test]
    fn test_from_bytes_preserves_handle() {
        let bytes = [7u8; AUTHOR_ID_LEN];
        let id = AuthorId::from_bytes(bytes);
        assert_eq!(id.as_bytes(), &bytes);
    }
}
