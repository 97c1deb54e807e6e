//! OAuth2 data model.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use signon_crypto::random::{generate_auth_code, generate_token};

/// A single-use authorization code and the authentication event it binds.
///
/// `used` transitions `false → true` exactly once, via an atomic
/// conditional store update; the record is redeemable only while
/// `!used` and the expiry has not passed. A code is never re-issued for
/// the same authentication event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationCodeRecord {
    /// Opaque code value.
    pub code: String,
    /// Subject identifier.
    pub subject: String,
    /// Granted claim names.
    pub claims: BTreeSet<String>,
    /// Sector identifier for pairwise subject derivation.
    pub sector_identifier: String,
    /// Whether the authentication event created the account.
    pub is_new_account: bool,
    /// Issuance time, epoch seconds.
    pub issued_at: i64,
    /// Expiry time, epoch seconds.
    pub expires_at: i64,
    /// Whether the code has been redeemed.
    pub used: bool,
}

impl AuthorizationCodeRecord {
    /// Creates a record with a fresh opaque code, valid for `ttl_secs`.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        claims: BTreeSet<String>,
        sector_identifier: impl Into<String>,
        is_new_account: bool,
        ttl_secs: i64,
    ) -> Self {
        let issued_at = Utc::now().timestamp();
        Self {
            code: generate_auth_code(),
            subject: subject.into(),
            claims,
            sector_identifier: sector_identifier.into(),
            is_new_account,
            issued_at,
            expires_at: issued_at + ttl_secs,
            used: false,
        }
    }

    /// Returns whether the code has expired at `now` (epoch seconds).
    #[must_use]
    pub const fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }

    /// Returns the record with the code marked used.
    #[must_use]
    pub fn into_used(mut self) -> Self {
        self.used = true;
        self
    }

    /// Store key for this record's code.
    #[must_use]
    pub fn store_key(&self) -> String {
        code_key(&self.code)
    }
}

/// Store key for an authorization code.
#[must_use]
pub fn code_key(code: &str) -> String {
    format!("authcode:{code}")
}

/// Store key for an access token.
#[must_use]
pub fn token_key(token: &str) -> String {
    format!("token:{token}")
}

/// An issued bearer access token.
///
/// Created exactly once, atomically with code consumption, and immutable
/// thereafter. Looked up by token value for userinfo resolution. Never
/// renewed; expiry is enforced by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenRecord {
    /// Opaque bearer token value.
    pub token: String,
    /// Subject identifier.
    pub subject: String,
    /// Granted claim names.
    pub claims: BTreeSet<String>,
    /// Whether the authentication event created the account.
    pub is_new_account: bool,
    /// Sector identifier for pairwise subject derivation.
    pub sector_identifier: String,
    /// Issuance time, epoch seconds.
    pub issued_at: i64,
}

impl AccessTokenRecord {
    /// Creates a token record bound to a consumed authorization code.
    #[must_use]
    pub fn for_code(record: &AuthorizationCodeRecord) -> Self {
        Self {
            token: generate_token(),
            subject: record.subject.clone(),
            claims: record.claims.clone(),
            is_new_account: record.is_new_account,
            sector_identifier: record.sector_identifier.clone(),
            issued_at: Utc::now().timestamp(),
        }
    }
}

/// Token endpoint success response: a bearer token, no refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The access token.
    pub access_token: String,

    /// Token type (always "Bearer").
    pub token_type: String,
}

impl TokenResponse {
    /// Creates a bearer response for the given token value.
    #[must_use]
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
        }
    }
}
