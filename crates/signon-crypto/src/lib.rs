//! # signon-crypto
//!
//! Cryptographic operations for the sign-on credential core using aws-lc-rs.
//!
//! The central abstraction is the [`SigningOracle`]: a sign-only custody
//! boundary over an externally held asymmetric key. Private key material
//! never crosses the trait; callers submit signing input and receive
//! signature bytes, the way a remote HSM/KMS interface behaves. Two
//! implementations are provided: a transit-style remote client and a
//! local-key signer used by tests and local deployments.
//!
//! On top of the oracle this crate assembles compact JWS tokens (RS256 and
//! ES256, with DER→JOSE signature transcoding for the EC path) and compact
//! JWE envelopes (RSA-OAEP-256 + A256GCM) for outbound encrypted JWTs.
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - SC-12: Cryptographic key management (custody boundary)
//! - SC-13: Cryptographic protection

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod algorithm;
pub mod hash;
pub mod jwe;
pub mod jws;
pub mod oracle;
pub mod random;
pub mod transcode;

pub use algorithm::{AlgorithmError, SigningAlgorithm};
pub use hash::{hmac_sha1, sha256};
pub use jwe::JweEncrypter;
pub use jws::JwsSigner;
pub use oracle::{CryptoError, LocalKeySigner, RemoteSigner, SigningOracle};
pub use transcode::{der_to_fixed, fixed_to_der};
