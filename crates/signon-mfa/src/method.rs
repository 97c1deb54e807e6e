//! MFA method strategy trait.

use async_trait::async_trait;

use crate::error::MfaResult;
use crate::types::{JourneyType, MfaMethodType};

/// Context for one verification attempt.
#[derive(Debug, Clone)]
pub struct MfaContext {
    /// Subject (session-scoped) the attempt belongs to.
    pub subject: String,
    /// Registration or sign-in.
    pub journey: JourneyType,
    /// Journey-supplied profile data: the not-yet-persisted base32 secret
    /// for authenticator-app registration, the destination phone number
    /// for SMS.
    pub profile: Option<String>,
    /// Whether the calling client is a designated test client. Only
    /// meaningful when the test-client bypass is enabled in configuration.
    pub is_test_client: bool,
}

impl MfaContext {
    /// Creates a context for the given subject and journey.
    #[must_use]
    pub fn new(subject: impl Into<String>, journey: JourneyType) -> Self {
        Self {
            subject: subject.into(),
            journey,
            profile: None,
            is_test_client: false,
        }
    }

    /// Attaches journey-supplied profile data.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Marks the caller as a designated test client.
    #[must_use]
    pub const fn test_client(mut self, is_test_client: bool) -> Self {
        self.is_test_client = is_test_client;
        self
    }
}

/// A verification strategy for one MFA method type.
///
/// Strategies own only the code comparison and their success side effects;
/// retry counting and lockout live in [`crate::verifier::MfaVerifier`],
/// which runs before any strategy is consulted.
#[async_trait]
pub trait MfaMethod: Send + Sync {
    /// The method type this strategy serves.
    fn method_type(&self) -> MfaMethodType;

    /// Compares the candidate code against the method's expected value.
    ///
    /// ## Errors
    ///
    /// Returns [`crate::MfaError::InvalidCode`] when the comparison fails,
    /// a validation error for malformed input, or a fatal error for
    /// journeys the method does not serve.
    async fn verify(&self, context: &MfaContext, code: &str) -> MfaResult<()>;

    /// Side effects after a successful verification (credential
    /// finalization, stored-code consumption). Default: none.
    async fn on_success(&self, _context: &MfaContext) -> MfaResult<()> {
        Ok(())
    }
}
