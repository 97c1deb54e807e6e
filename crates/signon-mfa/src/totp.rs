//! Authenticator-app (TOTP) verification strategy.
//!
//! RFC 6238 semantics: HMAC-SHA1 over the time-window index, 4-byte
//! dynamic truncation, six digits. The look-around radius is asymmetric
//! (offsets `-((W-1)/2)` through `W/2` for `W` allowed windows), biasing
//! acceptance toward the future to tolerate client clock drift. The bias
//! is a deliberate policy; do not symmetrize it.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use data_encoding::BASE32_NOPAD;
use signon_crypto::hmac_sha1;

use crate::credential::CredentialProvider;
use crate::error::{MfaError, MfaResult};
use crate::method::{MfaContext, MfaMethod};
use crate::types::{JourneyType, MfaMethodType, TotpSecret};

/// TOTP configuration.
#[derive(Debug, Clone)]
pub struct TotpConfig {
    /// Window length in seconds.
    pub window_secs: u64,
    /// Number of windows accepted around the current one.
    pub allowed_windows: u32,
}

impl Default for TotpConfig {
    fn default() -> Self {
        Self {
            window_secs: 30,
            allowed_windows: 3,
        }
    }
}

impl TotpConfig {
    /// Creates a new TOTP configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window length in seconds.
    #[must_use]
    pub const fn window_secs(mut self, secs: u64) -> Self {
        self.window_secs = secs;
        self
    }

    /// Sets the number of accepted windows.
    #[must_use]
    pub const fn allowed_windows(mut self, count: u32) -> Self {
        self.allowed_windows = count;
        self
    }
}

/// Validates a candidate one-time code: a non-empty numeric string of at
/// most six digits whose integer value lies strictly between 0 and 10^6.
///
/// ## Errors
///
/// Returns a validation error describing the first violated constraint.
pub(crate) fn validate_candidate(code: &str) -> MfaResult<u32> {
    if code.is_empty() {
        return Err(MfaError::Validation("code must not be empty".to_string()));
    }
    if code.len() > 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MfaError::Validation(
            "code must be at most six digits".to_string(),
        ));
    }
    let value: u32 = code
        .parse()
        .map_err(|_| MfaError::Validation("code must be numeric".to_string()))?;
    if value == 0 || value >= 1_000_000 {
        return Err(MfaError::Validation("code out of range".to_string()));
    }
    Ok(value)
}

/// Computes the six-digit code for a secret at a window index.
#[must_use]
pub fn code_at(secret: &[u8], window_index: u64) -> u32 {
    let tag = hmac_sha1(secret, &window_index.to_be_bytes());
    truncate(&tag)
}

/// RFC 4226 dynamic truncation, modulo 10^6.
fn truncate(hmac: &[u8]) -> u32 {
    let offset = (hmac.last().copied().unwrap_or(0) & 0x0f) as usize;
    let code = u32::from_be_bytes([
        hmac.get(offset).copied().unwrap_or(0) & 0x7f,
        hmac.get(offset + 1).copied().unwrap_or(0),
        hmac.get(offset + 2).copied().unwrap_or(0),
        hmac.get(offset + 3).copied().unwrap_or(0),
    ]);
    code % 1_000_000
}

/// Checks a candidate against every window in the configured radius at the
/// given time.
#[must_use]
pub fn matches_at(secret: &[u8], candidate: u32, unix_millis: u64, config: &TotpConfig) -> bool {
    let window_millis = config.window_secs * 1000;
    if window_millis == 0 {
        return false;
    }
    #[allow(clippy::cast_possible_wrap)]
    let current = (unix_millis / window_millis) as i64;

    let radius = i64::from(config.allowed_windows);
    let earliest = -((radius - 1) / 2);
    let latest = radius / 2;

    for offset in earliest..=latest {
        let index = current + offset;
        if index < 0 {
            continue;
        }
        #[allow(clippy::cast_sign_loss)]
        if code_at(secret, index as u64) == candidate {
            return true;
        }
    }
    false
}

/// Decodes a base32 secret, tolerating lowercase and trailing padding.
fn decode_secret(secret: &TotpSecret) -> Result<Vec<u8>, data_encoding::DecodeError> {
    let normalized = secret.expose().trim_end_matches('=').to_ascii_uppercase();
    BASE32_NOPAD.decode(normalized.as_bytes())
}

/// Authenticator-app verification strategy.
///
/// The secret source depends on the journey: registration verifies against
/// the freshly supplied, not-yet-persisted secret; sign-in reads the
/// subject's enabled, verified credential and fails with a distinct
/// no-credential error when none exists.
pub struct TotpMethod<C: CredentialProvider> {
    credentials: Arc<C>,
    config: TotpConfig,
}

impl<C: CredentialProvider> TotpMethod<C> {
    /// Creates the strategy over a credential provider.
    #[must_use]
    pub fn new(credentials: Arc<C>, config: TotpConfig) -> Self {
        Self {
            credentials,
            config,
        }
    }

    async fn secret_for(&self, context: &MfaContext) -> MfaResult<TotpSecret> {
        match context.journey {
            JourneyType::Registration => context
                .profile
                .as_ref()
                .map(TotpSecret::new)
                .ok_or_else(|| {
                    MfaError::Validation("registration requires an authenticator secret".to_string())
                }),
            JourneyType::SignIn => self
                .credentials
                .verified_auth_app_secret(&context.subject)
                .await?
                .ok_or(MfaError::CredentialMissing),
        }
    }

    fn secret_bytes(context: &MfaContext, secret: &TotpSecret) -> MfaResult<Vec<u8>> {
        match decode_secret(secret) {
            Ok(bytes) if !bytes.is_empty() => Ok(bytes),
            // Registration secrets arrive from the caller and must be valid
            // base32; sign-in secrets were validated at registration time,
            // so a decode failure there is a broken invariant.
            _ if context.journey == JourneyType::Registration => Err(MfaError::Validation(
                "authenticator secret is not valid base32".to_string(),
            )),
            _ => Err(MfaError::Internal(
                "stored authenticator secret is not valid base32".to_string(),
            )),
        }
    }
}

#[async_trait]
impl<C: CredentialProvider> MfaMethod for TotpMethod<C> {
    fn method_type(&self) -> MfaMethodType {
        MfaMethodType::AuthApp
    }

    async fn verify(&self, context: &MfaContext, code: &str) -> MfaResult<()> {
        let candidate = validate_candidate(code)?;
        let secret = self.secret_for(context).await?;
        let bytes = Self::secret_bytes(context, &secret)?;

        let now_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| MfaError::Internal(e.to_string()))?
            .as_millis();
        #[allow(clippy::cast_possible_truncation)]
        let now_millis = now_millis as u64;

        if matches_at(&bytes, candidate, now_millis, &self.config) {
            Ok(())
        } else {
            Err(MfaError::InvalidCode)
        }
    }

    async fn on_success(&self, context: &MfaContext) -> MfaResult<()> {
        // Registration success finalizes the credential as the subject's
        // verified MFA method
        if context.journey == JourneyType::Registration {
            let secret = self.secret_for(context).await?;
            self.credentials
                .finalize_auth_app(&context.subject, &secret)
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    const SECRET: &[u8] = b"12345678901234567890";

    struct StubCredentials {
        secret: Option<TotpSecret>,
        finalized: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CredentialProvider for StubCredentials {
        async fn verified_auth_app_secret(&self, _subject: &str) -> MfaResult<Option<TotpSecret>> {
            Ok(self.secret.clone())
        }

        async fn finalize_auth_app(&self, subject: &str, _secret: &TotpSecret) -> MfaResult<()> {
            self.finalized.lock().push(subject.to_string());
            Ok(())
        }
    }

    fn base32_secret() -> String {
        data_encoding::BASE32_NOPAD.encode(SECRET)
    }

    fn now_millis() -> u64 {
        #[allow(clippy::cast_possible_truncation)]
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        millis
    }

    #[test]
    fn candidate_validation() {
        assert!(validate_candidate("").is_err());
        assert!(validate_candidate("12a456").is_err());
        assert!(validate_candidate("1234567").is_err());
        assert!(validate_candidate("0").is_err());
        assert!(validate_candidate("000000").is_err());
        assert_eq!(validate_candidate("000001").unwrap(), 1);
        assert_eq!(validate_candidate("999999").unwrap(), 999_999);
    }

    #[test]
    fn rfc6238_sha1_vector() {
        // RFC 6238 appendix B, T=59s: the 8-digit SHA-1 TOTP is 94287082,
        // so the 6-digit truncation is 287082. 59s / 30s = window 1.
        assert_eq!(code_at(SECRET, 1), 287_082);
    }

    #[test]
    fn window_radius_is_asymmetric() {
        let config = TotpConfig::new().window_secs(30).allowed_windows(4);
        let now = 1_700_000_000_000u64;
        let current = now / 30_000;

        // W=4 accepts offsets -1..=2
        for offset in [-1i64, 0, 1, 2] {
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
            let index = (current as i64 + offset) as u64;
            let candidate = code_at(SECRET, index);
            assert!(
                matches_at(SECRET, candidate, now, &config),
                "offset {offset} should be accepted"
            );
        }
        for offset in [-2i64, 3] {
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
            let index = (current as i64 + offset) as u64;
            let candidate = code_at(SECRET, index);
            assert!(
                !matches_at(SECRET, candidate, now, &config),
                "offset {offset} should be rejected"
            );
        }
    }

    #[test]
    fn thirty_seconds_old_accepted_ninety_rejected() {
        let config = TotpConfig::new().window_secs(30).allowed_windows(3);
        let now = 1_700_000_000_000u64;

        let past_30s = code_at(SECRET, (now - 30_000) / 30_000);
        assert!(matches_at(SECRET, past_30s, now, &config));

        let past_90s = code_at(SECRET, (now - 90_000) / 30_000);
        assert!(!matches_at(SECRET, past_90s, now, &config));
    }

    #[tokio::test]
    async fn registration_verifies_supplied_secret_and_finalizes() {
        let credentials = Arc::new(StubCredentials {
            secret: None,
            finalized: Mutex::new(Vec::new()),
        });
        let method = TotpMethod::new(credentials.clone(), TotpConfig::default());

        let context = MfaContext::new("subject-1", JourneyType::Registration)
            .with_profile(base32_secret());
        let code = format!("{:06}", code_at(SECRET, now_millis() / 30_000));

        method.verify(&context, &code).await.unwrap();
        method.on_success(&context).await.unwrap();
        assert_eq!(credentials.finalized.lock().as_slice(), ["subject-1"]);
    }

    #[tokio::test]
    async fn registration_rejects_invalid_base32() {
        let credentials = Arc::new(StubCredentials {
            secret: None,
            finalized: Mutex::new(Vec::new()),
        });
        let method = TotpMethod::new(credentials, TotpConfig::default());

        let context =
            MfaContext::new("subject-1", JourneyType::Registration).with_profile("not base32!");
        let result = method.verify(&context, "123456").await;
        assert!(matches!(result, Err(MfaError::Validation(_))));
    }

    #[tokio::test]
    async fn sign_in_without_credential_is_distinct_error() {
        let credentials = Arc::new(StubCredentials {
            secret: None,
            finalized: Mutex::new(Vec::new()),
        });
        let method = TotpMethod::new(credentials, TotpConfig::default());

        let context = MfaContext::new("subject-1", JourneyType::SignIn);
        let result = method.verify(&context, "123456").await;
        assert!(matches!(result, Err(MfaError::CredentialMissing)));
    }

    #[tokio::test]
    async fn sign_in_uses_stored_credential() {
        let credentials = Arc::new(StubCredentials {
            secret: Some(TotpSecret::new(base32_secret())),
            finalized: Mutex::new(Vec::new()),
        });
        let method = TotpMethod::new(credentials.clone(), TotpConfig::default());

        let context = MfaContext::new("subject-1", JourneyType::SignIn);
        let code = format!("{:06}", code_at(SECRET, now_millis() / 30_000));
        method.verify(&context, &code).await.unwrap();

        // Sign-in success does not re-finalize the credential
        method.on_success(&context).await.unwrap();
        assert!(credentials.finalized.lock().is_empty());
    }

    #[tokio::test]
    async fn wrong_code_is_invalid_not_validation() {
        let credentials = Arc::new(StubCredentials {
            secret: Some(TotpSecret::new(base32_secret())),
            finalized: Mutex::new(Vec::new()),
        });
        let method = TotpMethod::new(credentials, TotpConfig::default());

        let context = MfaContext::new("subject-1", JourneyType::SignIn);
        let current = code_at(SECRET, now_millis() / 30_000);
        // Pick a six-digit value that is not the current code
        let wrong = if current == 111_111 { 222_222 } else { 111_111 };
        let result = method.verify(&context, &format!("{wrong:06}")).await;
        assert!(matches!(result, Err(MfaError::InvalidCode)));
    }
}
