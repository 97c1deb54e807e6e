//! Authorization-code exchange.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use signon_core::{EventOutcome, EventType, SecurityEvent};
use signon_store::CodeStore;

use crate::error::{OauthError, OauthResult};
use crate::types::{
    code_key, token_key, AccessTokenRecord, AuthorizationCodeRecord, TokenResponse,
};

/// Exchange configuration.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Authorization-code lifetime in seconds.
    pub auth_code_ttl_secs: u64,
    /// Access-token record retention in seconds (for userinfo lookup;
    /// token expiry itself is caller-enforced).
    pub access_token_ttl_secs: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            auth_code_ttl_secs: 300,
            access_token_ttl_secs: 180,
        }
    }
}

impl ExchangeConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the authorization-code lifetime.
    #[must_use]
    pub const fn auth_code_ttl_secs(mut self, secs: u64) -> Self {
        self.auth_code_ttl_secs = secs;
        self
    }

    /// Sets the access-token record retention.
    #[must_use]
    pub const fn access_token_ttl_secs(mut self, secs: u64) -> Self {
        self.access_token_ttl_secs = secs;
        self
    }
}

/// Consumes single-use authorization codes and issues bearer tokens.
///
/// Callers must have validated client authentication (private-key-JWT
/// assertion) before invoking the exchange; this component never sees
/// client credentials.
pub struct AuthorizationCodeExchanger<S: CodeStore> {
    store: Arc<S>,
    config: ExchangeConfig,
}

impl<S: CodeStore> AuthorizationCodeExchanger<S> {
    /// Creates an exchanger over the given store.
    #[must_use]
    pub fn new(store: Arc<S>, config: ExchangeConfig) -> Self {
        Self { store, config }
    }

    /// Issues a fresh authorization code for a completed authentication
    /// event and persists it with the configured TTL.
    ///
    /// ## Errors
    ///
    /// Returns a server error if the store is unavailable.
    pub async fn issue_code(
        &self,
        subject: impl Into<String>,
        claims: BTreeSet<String>,
        sector_identifier: impl Into<String>,
        is_new_account: bool,
    ) -> OauthResult<AuthorizationCodeRecord> {
        #[allow(clippy::cast_possible_wrap)]
        let ttl_secs = self.config.auth_code_ttl_secs as i64;
        let record = AuthorizationCodeRecord::new(
            subject,
            claims,
            sector_identifier,
            is_new_account,
            ttl_secs,
        );

        self.store
            .put(
                &record.store_key(),
                &record,
                Duration::from_secs(self.config.auth_code_ttl_secs),
            )
            .await?;

        Ok(record)
    }

    /// Exchanges a presented authorization code for a bearer access token.
    ///
    /// The consumption is one atomic conditional write: of any number of
    /// concurrent redemption attempts for the same code, exactly one wins.
    ///
    /// ## Errors
    ///
    /// - [`OauthError::InvalidRequest`] when the code is missing, already
    ///   used, expired, or lost a concurrent redemption race; all four
    ///   are indistinguishable by design
    /// - [`OauthError::ServerError`] on store failure, never retried
    pub async fn exchange(&self, presented_code: &str) -> OauthResult<TokenResponse> {
        let key = code_key(presented_code);

        let record: Option<AuthorizationCodeRecord> = self.store.get(&key).await?;
        let Some(record) = record else {
            return Err(self.rejected());
        };

        if record.used || record.is_expired(Utc::now().timestamp()) {
            return Err(self.rejected());
        }

        // Atomic used transition; a lost race is indistinguishable from a
        // replayed code
        let consumed = record.clone().into_used();
        let won = self.store.swap_if_eq(&key, &record, &consumed).await?;
        if !won {
            return Err(self.rejected());
        }

        let token_record = AccessTokenRecord::for_code(&record);
        self.store
            .put(
                &token_key(&token_record.token),
                &token_record,
                Duration::from_secs(self.config.access_token_ttl_secs),
            )
            .await?;

        SecurityEvent::new(EventType::CodeToToken, EventOutcome::Success)
            .with_subject(&record.subject)
            .emit();

        Ok(TokenResponse::bearer(token_record.token))
    }

    /// Resolves an access-token record by token value (userinfo path).
    ///
    /// ## Errors
    ///
    /// Returns a server error if the store is unavailable.
    pub async fn lookup_access_token(
        &self,
        token: &str,
    ) -> OauthResult<Option<AccessTokenRecord>> {
        Ok(self.store.get(&token_key(token)).await?)
    }

    fn rejected(&self) -> OauthError {
        SecurityEvent::new(EventType::CodeToTokenError, EventOutcome::Failure).emit();
        OauthError::InvalidRequest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signon_store::InMemoryCodeStore;

    fn exchanger() -> AuthorizationCodeExchanger<InMemoryCodeStore> {
        AuthorizationCodeExchanger::new(Arc::new(InMemoryCodeStore::new()), ExchangeConfig::new())
    }

    fn claims() -> BTreeSet<String> {
        ["email".to_string()].into()
    }

    #[tokio::test]
    async fn valid_code_exchanges_once() {
        let exchanger = exchanger();
        let record = exchanger
            .issue_code("subject-1", claims(), "sector.example", false)
            .await
            .unwrap();

        let response = exchanger.exchange(&record.code).await.unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert!(!response.access_token.is_empty());

        // Replay: same generic rejection as an unknown code
        let replay = exchanger.exchange(&record.code).await;
        assert!(matches!(replay, Err(OauthError::InvalidRequest)));
    }

    #[tokio::test]
    async fn unknown_code_is_rejected() {
        let exchanger = exchanger();
        let result = exchanger.exchange("no-such-code").await;
        assert!(matches!(result, Err(OauthError::InvalidRequest)));
    }

    #[tokio::test]
    async fn expired_code_is_rejected() {
        let store = Arc::new(InMemoryCodeStore::new());
        let exchanger = AuthorizationCodeExchanger::new(store.clone(), ExchangeConfig::new());

        // Store an already-expired record directly; the store TTL is long
        // enough that the record itself is still readable
        let mut record =
            AuthorizationCodeRecord::new("subject-1", claims(), "sector.example", false, 300);
        record.expires_at = record.issued_at - 1;
        store
            .put(&record.store_key(), &record, Duration::from_secs(300))
            .await
            .unwrap();

        let result = exchanger.exchange(&record.code).await;
        assert!(matches!(result, Err(OauthError::InvalidRequest)));
    }

    #[tokio::test]
    async fn used_and_expired_yield_identical_error_objects() {
        let store = Arc::new(InMemoryCodeStore::new());
        let exchanger = AuthorizationCodeExchanger::new(store.clone(), ExchangeConfig::new());

        // Expired but unused
        let mut expired =
            AuthorizationCodeRecord::new("subject-1", claims(), "sector.example", false, 300);
        expired.expires_at = expired.issued_at - 1;
        store
            .put(&expired.store_key(), &expired, Duration::from_secs(300))
            .await
            .unwrap();

        // Used but unexpired
        let fresh = exchanger
            .issue_code("subject-2", claims(), "sector.example", false)
            .await
            .unwrap();
        exchanger.exchange(&fresh.code).await.unwrap();

        let expired_err = exchanger.exchange(&expired.code).await.unwrap_err();
        let used_err = exchanger.exchange(&fresh.code).await.unwrap_err();
        assert_eq!(
            expired_err.to_error_response(),
            used_err.to_error_response()
        );
    }

    #[tokio::test]
    async fn issued_token_resolves_for_userinfo() {
        let exchanger = exchanger();
        let record = exchanger
            .issue_code("subject-1", claims(), "sector.example", true)
            .await
            .unwrap();

        let response = exchanger.exchange(&record.code).await.unwrap();
        let token = exchanger
            .lookup_access_token(&response.access_token)
            .await
            .unwrap()
            .expect("token record should resolve");

        assert_eq!(token.subject, "subject-1");
        assert!(token.is_new_account);
        assert_eq!(token.sector_identifier, "sector.example");
    }

    #[tokio::test]
    async fn unknown_token_resolves_to_none() {
        let exchanger = exchanger();
        let token = exchanger.lookup_access_token("missing").await.unwrap();
        assert!(token.is_none());
    }
}
