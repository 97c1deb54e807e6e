//! Signing algorithm definitions.
//!
//! The external-provider contract pins the token algorithms to RS256 and
//! ES256; nothing else is accepted at this boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for algorithm operations.
#[derive(Debug, Error)]
pub enum AlgorithmError {
    /// Unknown or unsupported algorithm.
    #[error("unsupported algorithm: {0}")]
    Unsupported(String),
}

/// JWS signing algorithms supported by the credential core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SigningAlgorithm {
    /// RSA PKCS#1 v1.5 with SHA-256.
    #[serde(rename = "RS256")]
    Rs256,

    /// ECDSA using P-256 curve and SHA-256 hash.
    #[serde(rename = "ES256")]
    Es256,
}

impl SigningAlgorithm {
    /// Returns the JWA algorithm name.
    #[must_use]
    pub const fn jwa_name(self) -> &'static str {
        match self {
            Self::Rs256 => "RS256",
            Self::Es256 => "ES256",
        }
    }

    /// Returns whether this is an RSA algorithm.
    #[must_use]
    pub const fn is_rsa(self) -> bool {
        matches!(self, Self::Rs256)
    }

    /// Returns whether this is an ECDSA algorithm.
    #[must_use]
    pub const fn is_ecdsa(self) -> bool {
        matches!(self, Self::Es256)
    }

    /// Returns the JOSE signature length in bytes for ECDSA algorithms.
    ///
    /// The JWS form of an ECDSA signature is the fixed-length big-endian
    /// concatenation `r ‖ s`, two field elements of the curve. For RSA the
    /// signature length is the key modulus length, so `None` here.
    #[must_use]
    pub const fn jose_signature_len(self) -> Option<usize> {
        match self {
            Self::Es256 => Some(64),
            Self::Rs256 => None,
        }
    }

    /// Parses a JWA algorithm name.
    ///
    /// ## Errors
    ///
    /// Returns an error if the algorithm is not one this core supports.
    pub fn from_jwa(name: &str) -> Result<Self, AlgorithmError> {
        match name {
            "RS256" => Ok(Self::Rs256),
            "ES256" => Ok(Self::Es256),
            _ => Err(AlgorithmError::Unsupported(name.to_string())),
        }
    }
}
