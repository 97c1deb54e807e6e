//! Outbound delegated-authorization requests.

use std::sync::Arc;

use signon_core::{CoreError, CoreResult, EventOutcome, EventType, SecurityEvent, SessionConfig};
use signon_crypto::{JweEncrypter, JwsSigner};
use signon_store::CodeStore;

use crate::config::DelegationConfig;

/// Store key for a session's authorization state.
#[must_use]
pub(crate) fn state_key(session_id: &str) -> String {
    format!("state:{session_id}")
}

/// Parameters of one delegated-authorization request.
#[derive(Debug, Clone)]
pub struct RequestParams {
    /// Random correlation state, previously stored for the session.
    pub state: String,
    /// Requested scope.
    pub scope: String,
    /// Pairwise subject identifier for the external provider.
    pub pairwise_subject: String,
    /// Requested claims, as the provider's claims JSON.
    pub claims: serde_json::Value,
    /// Journey identifier threaded through for tracing.
    pub journey_id: String,
    /// The user's email address.
    pub email: String,
}

/// Builds signed+encrypted request objects for the external
/// identity-verification provider and stores the per-session correlation
/// state for its callback.
pub struct ExternalAuthorizationRequestBuilder<S: CodeStore> {
    pub(crate) store: Arc<S>,
    signer: JwsSigner,
    encrypter: JweEncrypter,
    config: DelegationConfig,
    session: SessionConfig,
}

impl<S: CodeStore> ExternalAuthorizationRequestBuilder<S> {
    /// Creates a builder over the given store, signer, and recipient key.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        signer: JwsSigner,
        encrypter: JweEncrypter,
        config: DelegationConfig,
        session: SessionConfig,
    ) -> Self {
        Self {
            store,
            signer,
            encrypter,
            config,
            session,
        }
    }

    /// Persists the session's random state value with the session TTL.
    ///
    /// The value is not consumed on read; replay resistance comes from the
    /// session scoping and the short TTL.
    ///
    /// ## Errors
    ///
    /// Returns a fatal error if the store is unavailable.
    pub async fn store_state(&self, session_id: &str, state: &str) -> CoreResult<()> {
        self.store
            .put(
                &state_key(session_id),
                &state.to_string(),
                self.session.session_ttl(),
            )
            .await
            .map_err(|e| CoreError::StoreUnavailable(e.to_string()))
    }

    /// Constructs the encrypted request object: the claim set is signed
    /// through the custody oracle, then the signed token is encrypted to
    /// the provider's public key. Both steps are mandatory; failure of
    /// either aborts the request with nothing emitted.
    ///
    /// ## Errors
    ///
    /// Returns a fatal crypto error if signing or encryption fails.
    pub async fn construct_request(&self, params: &RequestParams) -> CoreResult<String> {
        let claims = serde_json::json!({
            "client_id": self.config.client_id,
            "state": params.state,
            "response_type": "code",
            "scope": params.scope,
            "sub": params.pairwise_subject,
            "claims": params.claims,
            "govuk_signin_journey_id": params.journey_id,
            "email_address": params.email,
            "aud": self.config.audience,
            "iss": self.config.client_id,
        });

        let signed = self
            .signer
            .sign_claims(&claims)
            .await
            .map_err(|e| CoreError::Crypto(e.to_string()))?;

        let encrypted = self
            .encrypter
            .encrypt(signed.as_bytes(), "JWT")
            .map_err(|e| CoreError::Crypto(e.to_string()))?;

        SecurityEvent::new(EventType::DelegatedRequest, EventOutcome::Success)
            .with_subject(&params.pairwise_subject)
            .emit();

        Ok(encrypted)
    }

    /// Returns the provider authorize redirect for a request object.
    #[must_use]
    pub fn authorization_url(&self, request_object: &str) -> url::Url {
        self.config.authorization_url(request_object)
    }
}
