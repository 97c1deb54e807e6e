//! Credential provider seam.

use async_trait::async_trait;

use crate::error::MfaResult;
use crate::types::TotpSecret;

/// Access to a user's enrolled MFA credentials.
///
/// Credential persistence is an external collaborator; this trait is the
/// seam the TOTP strategy needs: the verified secret for sign-in, and the
/// finalization side effect when a registration verification succeeds.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Returns the secret of the subject's enabled, verified
    /// authenticator-app credential, or `None` if no such credential
    /// exists.
    async fn verified_auth_app_secret(&self, subject: &str) -> MfaResult<Option<TotpSecret>>;

    /// Marks the given secret as the subject's verified authenticator-app
    /// credential. Called exactly once, after the registration code check
    /// succeeds.
    async fn finalize_auth_app(&self, subject: &str, secret: &TotpSecret) -> MfaResult<()>;
}
