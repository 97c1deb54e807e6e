//! Cryptographically secure random value generation.
//!
//! This module provides secure random generation for:
//! - Authorization codes and bearer tokens
//! - One-time numeric codes (SMS OTP)
//! - Delegated-authorization state values

use rand::distr::{Alphanumeric, SampleString};
use rand::Rng;

/// Generates a cryptographically secure random byte array.
#[must_use]
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes[..]);
    bytes
}

/// Generates a cryptographically secure random alphanumeric string.
#[must_use]
pub fn random_alphanumeric(len: usize) -> String {
    let mut rng = rand::rng();
    Alphanumeric.sample_string(&mut rng, len)
}

/// Generates a secure random authorization code.
///
/// 32 alphanumeric characters give approximately 190 bits of entropy,
/// exceeding the 128-bit minimum recommended by RFC 6749.
#[must_use]
pub fn generate_auth_code() -> String {
    random_alphanumeric(32)
}

/// Generates a secure random opaque bearer token value.
#[must_use]
pub fn generate_token() -> String {
    random_alphanumeric(32)
}

/// Generates a secure random state value for the delegated-authorization
/// round trip, URL-safe base64 without padding.
#[must_use]
pub fn generate_state() -> String {
    let bytes = random_bytes(32);
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
}

/// Generates a secure random numeric one-time code of `digits` digits,
/// zero-padded.
#[must_use]
pub fn generate_numeric_code(digits: usize) -> String {
    let mut rng = rand::rng();
    (0..digits)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn random_bytes_produces_correct_length() {
        assert_eq!(random_bytes(16).len(), 16);
        assert_eq!(random_bytes(32).len(), 32);
    }

    #[test]
    fn random_bytes_produces_different_values() {
        assert_ne!(random_bytes(32), random_bytes(32));
    }

    #[test]
    fn generate_auth_code_format() {
        let code = generate_auth_code();
        assert_eq!(code.len(), 32);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generate_auth_code_uniqueness() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_auth_code()).collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn generate_state_is_url_safe() {
        let state = generate_state();
        assert!(state
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn generate_numeric_code_format() {
        let code = generate_numeric_code(6);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn numeric_codes_cover_leading_zeros() {
        // Zero-padding means a code like "012345" is representable; over
        // many draws at least one leading zero should appear
        let any_leading_zero = (0..2000)
            .map(|_| generate_numeric_code(6))
            .any(|c| c.starts_with('0'));
        assert!(any_leading_zero);
    }
}
