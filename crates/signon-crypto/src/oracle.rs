//! Signing-oracle custody abstraction.
//!
//! ## NIST 800-53 Rev5: SC-12 (Cryptographic Key Management)
//!
//! The signing key is custodied outside the caller: implementations expose
//! a sign operation only, and no key bytes cross the trait boundary. The
//! remote implementation speaks to a transit-style signing endpoint; the
//! local implementation holds an in-process key pair for tests and local
//! deployments.

use async_trait::async_trait;
use aws_lc_rs::{
    rand::SystemRandom,
    signature::{self, EcdsaKeyPair, KeyPair, RsaKeyPair, ECDSA_P256_SHA256_ASN1_SIGNING},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;
use tracing::Instrument;

use crate::algorithm::SigningAlgorithm;

/// Error type for cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Signing failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Invalid key format.
    #[error("invalid key format: {0}")]
    InvalidKey(String),

    /// Malformed signature bytes.
    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),

    /// Algorithm not supported by this signer.
    #[error("algorithm not supported: {0}")]
    UnsupportedAlgorithm(String),

    /// Remote custody service failure.
    #[error("remote signer error: {0}")]
    Remote(String),
}

/// Trait for externally custodied signing keys.
///
/// `sign` produces the raw signature over the given signing input:
/// PKCS#1 v1.5 bytes for RSA, a DER-encoded ECDSA signature for EC keys.
/// Callers that need the JOSE form transcode the EC output themselves
/// (see [`crate::jws::JwsSigner`]).
#[async_trait]
pub trait SigningOracle: Send + Sync {
    /// Signs the given input under the requested algorithm.
    ///
    /// ## Errors
    ///
    /// Returns an error if the algorithm is not served by this oracle or
    /// the signing operation fails. Failures are fatal to the caller;
    /// signing is never retried internally.
    async fn sign(
        &self,
        algorithm: SigningAlgorithm,
        signing_input: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;
}

enum KeyPairInner {
    Rsa(RsaKeyPair),
    Ecdsa(EcdsaKeyPair),
}

/// In-process signing key.
///
/// Test double and local-deployment implementation of [`SigningOracle`].
/// The key pair stays private to this struct; the public half is exposed
/// for verification.
pub struct LocalKeySigner {
    inner: KeyPairInner,
    algorithm: SigningAlgorithm,
}

impl std::fmt::Debug for LocalKeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalKeySigner")
            .field("algorithm", &self.algorithm)
            .field("key_pair", &"[REDACTED]")
            .finish()
    }
}

impl LocalKeySigner {
    /// Creates a signer from a PKCS#8 DER-encoded private key.
    ///
    /// ## Errors
    ///
    /// Returns an error if the key is invalid for the algorithm.
    pub fn from_pkcs8(
        algorithm: SigningAlgorithm,
        pkcs8_der: &[u8],
    ) -> Result<Self, CryptoError> {
        let inner = match algorithm {
            SigningAlgorithm::Rs256 => {
                let key_pair = RsaKeyPair::from_pkcs8(pkcs8_der)
                    .map_err(|e| CryptoError::InvalidKey(format!("invalid RSA key: {e}")))?;
                KeyPairInner::Rsa(key_pair)
            }
            SigningAlgorithm::Es256 => {
                let key_pair =
                    EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, pkcs8_der)
                        .map_err(|e| {
                            CryptoError::InvalidKey(format!("invalid ECDSA key: {e}"))
                        })?;
                KeyPairInner::Ecdsa(key_pair)
            }
        };

        Ok(Self { inner, algorithm })
    }

    /// Generates a fresh P-256 signing key.
    ///
    /// ## Errors
    ///
    /// Returns an error if key generation fails.
    pub fn generate_es256() -> Result<Self, CryptoError> {
        let rng = SystemRandom::new();
        let document = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, &rng)
            .map_err(|e| CryptoError::InvalidKey(format!("key generation failed: {e}")))?;
        Self::from_pkcs8(SigningAlgorithm::Es256, document.as_ref())
    }

    /// Returns the algorithm this signer serves.
    #[must_use]
    pub const fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Returns the public key bytes: an uncompressed curve point for ECDSA,
    /// the public key encoding of the RSA pair otherwise.
    #[must_use]
    pub fn public_key(&self) -> Vec<u8> {
        match &self.inner {
            KeyPairInner::Rsa(kp) => kp.public_key().as_ref().to_vec(),
            KeyPairInner::Ecdsa(kp) => kp.public_key().as_ref().to_vec(),
        }
    }
}

#[async_trait]
impl SigningOracle for LocalKeySigner {
    async fn sign(
        &self,
        algorithm: SigningAlgorithm,
        signing_input: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        if algorithm != self.algorithm {
            return Err(CryptoError::UnsupportedAlgorithm(format!(
                "signer holds a {} key, {} requested",
                self.algorithm.jwa_name(),
                algorithm.jwa_name()
            )));
        }

        let rng = SystemRandom::new();

        match &self.inner {
            KeyPairInner::Rsa(kp) => {
                let mut sig = vec![0u8; kp.public_modulus_len()];
                kp.sign(&signature::RSA_PKCS1_SHA256, &rng, signing_input, &mut sig)
                    .map_err(|e| CryptoError::Signing(format!("RSA signing failed: {e}")))?;
                Ok(sig)
            }
            KeyPairInner::Ecdsa(kp) => {
                let sig = kp
                    .sign(&rng, signing_input)
                    .map_err(|e| CryptoError::Signing(format!("ECDSA signing failed: {e}")))?;
                Ok(sig.as_ref().to_vec())
            }
        }
    }
}

/// Remote custody client.
///
/// Speaks to a transit-style signing endpoint: the signing input is posted
/// base64-encoded under a key label, and the service answers with the raw
/// signature bytes, base64-encoded. The private key never leaves the
/// custody service.
pub struct RemoteSigner {
    http: reqwest::Client,
    endpoint: String,
    key_label: String,
}

impl std::fmt::Debug for RemoteSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSigner")
            .field("endpoint", &self.endpoint)
            .field("key_label", &self.key_label)
            .finish()
    }
}

impl RemoteSigner {
    /// Creates a remote signer for the given endpoint and key label.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        endpoint: impl Into<String>,
        key_label: impl Into<String>,
    ) -> Result<Self, CryptoError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| CryptoError::Remote(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            key_label: key_label.into(),
        })
    }
}

#[async_trait]
impl SigningOracle for RemoteSigner {
    async fn sign(
        &self,
        algorithm: SigningAlgorithm,
        signing_input: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let url = format!("{}/v1/sign/{}", self.endpoint, self.key_label);

        let span = tracing::info_span!(
            "oracle.sign",
            http.method = "POST",
            url = %url,
            algorithm = algorithm.jwa_name()
        );

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "algorithm": algorithm.jwa_name(),
                "input": STANDARD.encode(signing_input),
            }))
            .send()
            .instrument(span)
            .await
            .map_err(|e| CryptoError::Remote(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CryptoError::Remote(format!(
                "signing endpoint returned {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CryptoError::Remote(e.to_string()))?;

        let signature = body
            .get("signature")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                CryptoError::Remote("signing response missing 'signature'".to_string())
            })?;

        STANDARD
            .decode(signature)
            .map_err(|e| CryptoError::Remote(format!("signature not base64: {e}")))
    }
}
