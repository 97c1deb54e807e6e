//! Compact JWS assembly over the signing oracle.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Serialize;

use crate::algorithm::SigningAlgorithm;
use crate::oracle::{CryptoError, SigningOracle};
use crate::transcode::der_to_fixed;

/// Builds compact JWS tokens (`header.payload.signature`) with signatures
/// produced by a [`SigningOracle`].
///
/// For ES256 the oracle's DER output is transcoded into the fixed-length
/// `r ‖ s` form JWS requires. Empty signing input short-circuits to an
/// empty signature without invoking the oracle (unsigned/placeholder
/// header combinations).
pub struct JwsSigner {
    oracle: Arc<dyn SigningOracle>,
    algorithm: SigningAlgorithm,
    key_id: Option<String>,
}

impl JwsSigner {
    /// Creates a signer over the given oracle.
    #[must_use]
    pub fn new(oracle: Arc<dyn SigningOracle>, algorithm: SigningAlgorithm) -> Self {
        Self {
            oracle,
            algorithm,
            key_id: None,
        }
    }

    /// Sets the `kid` header parameter.
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Returns the signing algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Produces the JWS signature over raw signing input.
    ///
    /// ## Errors
    ///
    /// Returns an error if the oracle fails or the ES256 output cannot be
    /// transcoded.
    pub async fn signature(&self, signing_input: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if signing_input.is_empty() {
            // Unsigned placeholder: the oracle is not invoked
            return Ok(Vec::new());
        }

        let raw = self.oracle.sign(self.algorithm, signing_input).await?;

        match self.algorithm.jose_signature_len() {
            Some(jose_len) => der_to_fixed(&raw, jose_len),
            None => Ok(raw),
        }
    }

    /// Signs a claim set into a compact JWS.
    ///
    /// ## Errors
    ///
    /// Returns an error if serialization or signing fails.
    pub async fn sign_claims<T: Serialize>(&self, claims: &T) -> Result<String, CryptoError> {
        let header = self.protected_header();
        let header_b64 = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&header).map_err(|e| CryptoError::Signing(e.to_string()))?,
        );
        let payload_b64 = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(claims).map_err(|e| CryptoError::Signing(e.to_string()))?,
        );

        let signing_input = format!("{header_b64}.{payload_b64}");
        let signature = self.signature(signing_input.as_bytes()).await?;
        let signature_b64 = URL_SAFE_NO_PAD.encode(signature);

        Ok(format!("{signing_input}.{signature_b64}"))
    }

    fn protected_header(&self) -> serde_json::Value {
        match &self.key_id {
            Some(kid) => serde_json::json!({
                "alg": self.algorithm.jwa_name(),
                "kid": kid,
            }),
            None => serde_json::json!({
                "alg": self.algorithm.jwa_name(),
            }),
        }
    }
}
