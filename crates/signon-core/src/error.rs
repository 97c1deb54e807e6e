//! Error handling for the sign-on credential core.
//!
//! ## NIST 800-53 Rev5: SI-11 (Error Handling)
//!
//! Error messages are informative for operators while not exposing
//! sensitive information to callers. Grant failures deliberately share a
//! single generic message so a caller cannot distinguish an unknown code
//! from a replayed or expired one.

use thiserror::Error;

/// Result type alias using the core error type.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Cross-cutting error taxonomy for the credential core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed input (non-numeric code, bad encoding, missing field).
    #[error("validation error: {0}")]
    Validation(String),

    /// Authorization grant missing, already used, or expired.
    ///
    /// ## NIST 800-53 Rev5: IA-6 (Authentication Feedback)
    ///
    /// The message is identical across all three sub-causes.
    #[error("invalid grant")]
    InvalidGrant,

    /// Verification retry limit exceeded for the session.
    #[error("verification attempts exceeded")]
    LockedOut,

    /// No enrolled MFA credential for the sign-in journey.
    #[error("no verified MFA credential")]
    CredentialMissing,

    /// Delegated-callback state did not match the stored session value.
    #[error("authorization state mismatch")]
    StateMismatch,

    /// Signing or encryption failure. Always fatal, never partially applied.
    #[error("cryptographic error: {0}")]
    Crypto(String),

    /// Backing store failure. Fatal; mutations are not safely repeatable,
    /// so the operation is never retried internally.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Internal error: broken invariant or unsupported operation reached
    /// at runtime (for example an SMS verification attempted on sign-in).
    #[error("internal error")]
    Internal,
}

impl CoreError {
    /// Returns whether this error maps to a 500-class response.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Crypto(_) | Self::StoreUnavailable(_) | Self::Internal
        )
    }

    /// Returns whether this error represents a client-correctable failure.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::InvalidGrant
                | Self::LockedOut
                | Self::CredentialMissing
                | Self::StateMismatch
        )
    }
}
