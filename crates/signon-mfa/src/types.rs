//! MFA data model.

use serde::{Deserialize, Serialize};

/// MFA method discriminator.
///
/// Selects the verification strategy at request time; also part of the
/// store key for per-method attempt state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MfaMethodType {
    /// Authenticator app (TOTP).
    AuthApp,
    /// SMS one-time code.
    Sms,
}

impl MfaMethodType {
    /// Returns the method name used in store keys and log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthApp => "AUTH_APP",
            Self::Sms => "SMS",
        }
    }
}

/// The journey a verification request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JourneyType {
    /// Enrolling a new MFA method.
    Registration,
    /// Authenticating with an already-verified method.
    SignIn,
}

/// Per-(subject, method) attempt state.
///
/// Created lazily on the first verification attempt; the counter resets to
/// zero on success and the blocked flag, once set, holds for the remainder
/// of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MfaAttemptState {
    /// Attempts made so far.
    pub retry_count: u32,
    /// Whether the method is blocked for this session.
    pub blocked: bool,
}

/// A base32-encoded shared TOTP secret.
///
/// The value never appears in logs or error messages; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotpSecret(String);

impl TotpSecret {
    /// Wraps a base32 secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Exposes the base32 string for decoding.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for TotpSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TotpSecret([REDACTED])")
    }
}

/// Purpose of an outbound one-time code notification.
///
/// Part of the store key: codes sent for one purpose cannot be replayed
/// against another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationPurpose {
    /// Verify a phone number during MFA registration.
    VerifyPhoneNumber,
    /// Verify an email address during account registration.
    VerifyEmail,
}

impl NotificationPurpose {
    /// Returns the key fragment for this purpose.
    #[must_use]
    pub const fn key_fragment(self) -> &'static str {
        match self {
            Self::VerifyPhoneNumber => "verify-phone",
            Self::VerifyEmail => "verify-email",
        }
    }
}

/// Store key for the attempt counter of `(subject, method)`.
#[must_use]
pub fn attempts_key(subject: &str, method: MfaMethodType) -> String {
    format!("mfa:attempts:{subject}:{}", method.as_str())
}

/// Store key for the blocked marker of `(subject, method)`.
#[must_use]
pub fn blocked_key(subject: &str, method: MfaMethodType) -> String {
    format!("mfa:blocked:{subject}:{}", method.as_str())
}

/// Store key for the one-time code of `(subject, purpose)`.
#[must_use]
pub fn otp_key(subject: &str, purpose: NotificationPurpose) -> String {
    format!("otp:{}:{subject}", purpose.key_fragment())
}
