//! Compact JWE encryption.
//!
//! Outbound delegated-authorization JWTs are signed first, then the entire
//! signed token is encrypted to the external provider's RSA public key:
//! `alg: RSA-OAEP-256`, `enc: A256GCM`, compact serialization. A fresh
//! content-encryption key and IV are drawn per token; the protected header
//! segment is the AEAD additional data, as RFC 7516 requires.

use aws_lc_rs::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use aws_lc_rs::rsa::{OaepPublicEncryptingKey, PublicEncryptingKey, OAEP_SHA256_MGF1SHA256};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::oracle::CryptoError;
use crate::random::random_bytes;

const CEK_LEN: usize = 32;
const IV_LEN: usize = 12;

/// Encrypts payloads into compact JWE for a fixed recipient key.
pub struct JweEncrypter {
    recipient_key: OaepPublicEncryptingKey,
}

impl std::fmt::Debug for JweEncrypter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JweEncrypter").finish_non_exhaustive()
    }
}

impl JweEncrypter {
    /// Creates an encrypter from the recipient's public key
    /// (X.509 `SubjectPublicKeyInfo` DER).
    ///
    /// ## Errors
    ///
    /// Returns an error if the key cannot be parsed or is not usable for
    /// RSA-OAEP.
    pub fn from_spki_der(der: &[u8]) -> Result<Self, CryptoError> {
        let key = PublicEncryptingKey::from_der(der)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid recipient key: {e}")))?;
        let recipient_key = OaepPublicEncryptingKey::new(key)
            .map_err(|e| CryptoError::InvalidKey(format!("key not usable for OAEP: {e}")))?;
        Ok(Self { recipient_key })
    }

    /// Creates an encrypter directly from a parsed public key.
    ///
    /// ## Errors
    ///
    /// Returns an error if the key is not usable for RSA-OAEP.
    pub fn from_public_key(key: PublicEncryptingKey) -> Result<Self, CryptoError> {
        let recipient_key = OaepPublicEncryptingKey::new(key)
            .map_err(|e| CryptoError::InvalidKey(format!("key not usable for OAEP: {e}")))?;
        Ok(Self { recipient_key })
    }

    /// Encrypts `payload` into a compact JWE.
    ///
    /// `cty` names the payload content type; outbound signed tokens pass
    /// `"JWT"`.
    ///
    /// ## Errors
    ///
    /// Returns an error if key wrapping or content encryption fails. A
    /// failure is total: no partial output is ever produced.
    pub fn encrypt(&self, payload: &[u8], cty: &str) -> Result<String, CryptoError> {
        let header = serde_json::json!({
            "alg": "RSA-OAEP-256",
            "enc": "A256GCM",
            "cty": cty,
        });
        let header_b64 = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&header).map_err(|e| CryptoError::Encryption(e.to_string()))?,
        );

        // Fresh CEK per token, wrapped to the recipient
        let cek = random_bytes(CEK_LEN);
        let mut wrapped = vec![0u8; self.recipient_key.ciphertext_size()];
        let wrapped = self
            .recipient_key
            .encrypt(&OAEP_SHA256_MGF1SHA256, &cek, &mut wrapped, None)
            .map_err(|_| CryptoError::Encryption("CEK wrapping failed".to_string()))?;

        let iv = random_bytes(IV_LEN);
        let nonce = Nonce::try_assume_unique_for_key(&iv)
            .map_err(|_| CryptoError::Encryption("invalid IV".to_string()))?;
        let content_key = UnboundKey::new(&AES_256_GCM, &cek)
            .map_err(|_| CryptoError::Encryption("invalid CEK".to_string()))?;
        let sealing = LessSafeKey::new(content_key);

        let mut ciphertext = payload.to_vec();
        let tag = sealing
            .seal_in_place_separate_tag(nonce, Aad::from(header_b64.as_bytes()), &mut ciphertext)
            .map_err(|_| CryptoError::Encryption("content encryption failed".to_string()))?;

        Ok(format!(
            "{header_b64}.{}.{}.{}.{}",
            URL_SAFE_NO_PAD.encode(wrapped),
            URL_SAFE_NO_PAD.encode(&iv),
            URL_SAFE_NO_PAD.encode(&ciphertext),
            URL_SAFE_NO_PAD.encode(tag.as_ref()),
        ))
    }
}
