//! MFA error types.

use signon_core::CoreError;
use signon_store::StoreError;
use thiserror::Error;

/// MFA verification errors.
#[derive(Debug, Error)]
pub enum MfaError {
    /// Code comparison failed. The attempt has been counted.
    #[error("code verification failed")]
    InvalidCode,

    /// Malformed input: non-numeric code, wrong length, bad base32 secret.
    #[error("validation error: {0}")]
    Validation(String),

    /// Retry limit reached for this session and method; no further
    /// attempts are accepted regardless of correctness.
    #[error("verification attempts exceeded")]
    LockedOut,

    /// Sign-in journey with no enabled, verified authenticator credential.
    /// Distinct from lockout: the caller should route to enrollment, not
    /// stop prompting.
    #[error("no verified MFA credential")]
    CredentialMissing,

    /// SMS codes are not a sign-in factor in this deployment. This is an
    /// intentional policy boundary, surfaced as a fatal error rather than
    /// a verification failure.
    #[error("SMS verification is not available for sign-in")]
    SmsSignInUnsupported,

    /// Backing store failure. Fatal, never retried.
    #[error("store unavailable: {0}")]
    Store(String),

    /// Internal error (missing strategy, corrupt stored state).
    #[error("internal MFA error: {0}")]
    Internal(String),
}

impl From<StoreError> for MfaError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}

impl MfaError {
    /// Returns whether this error is fatal (500-class) rather than a
    /// client-correctable verification outcome.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SmsSignInUnsupported | Self::Store(_) | Self::Internal(_)
        )
    }
}

impl From<MfaError> for CoreError {
    fn from(err: MfaError) -> Self {
        match err {
            MfaError::InvalidCode => Self::Validation("code verification failed".to_string()),
            MfaError::Validation(msg) => Self::Validation(msg),
            MfaError::LockedOut => Self::LockedOut,
            MfaError::CredentialMissing => Self::CredentialMissing,
            MfaError::SmsSignInUnsupported => Self::Internal,
            MfaError::Store(msg) => Self::StoreUnavailable(msg),
            MfaError::Internal(_) => Self::Internal,
        }
    }
}

/// Result type for MFA operations.
pub type MfaResult<T> = Result<T, MfaError>;
