//! Hash and MAC functions.

use aws_lc_rs::{digest, hmac};

/// Computes a SHA-256 hash of the input data.
#[must_use]
pub fn sha256(data: &[u8]) -> Vec<u8> {
    digest::digest(&digest::SHA256, data).as_ref().to_vec()
}

/// Computes an HMAC-SHA1 tag over the input data.
///
/// SHA-1 here is the RFC 6238 TOTP MAC, the algorithm authenticator apps
/// implement; it is not used for any other purpose in this workspace.
#[must_use]
pub fn hmac_sha1(key: &[u8], data: &[u8]) -> Vec<u8> {
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, key);
    hmac::sign(&key, data).as_ref().to_vec()
}
