//! OAuth2 protocol error types.
//!
//! Implements the error response shape of RFC 6749 §5.2, reduced to the
//! codes this core emits.
//!
//! ## NIST 800-53 Rev5: IA-6 (Authentication Feedback)
//!
//! Grant failures all surface as one generic `invalid_request`: a missing
//! code, a replayed code, and an expired code produce byte-identical error
//! objects, so the endpoint cannot be used as an oracle to distinguish
//! them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use signon_core::CoreError;
use signon_store::StoreError;

/// OAuth2 protocol errors.
#[derive(Debug, Error)]
pub enum OauthError {
    /// The presented grant is unusable: missing, already used, or expired.
    /// Deliberately generic across all three sub-causes.
    #[error("invalid request")]
    InvalidRequest,

    /// Server-side failure (store or token issuance). Never retried
    /// internally; an uncertain state must not be replayed against a
    /// non-idempotent mutation.
    #[error("server error: {0}")]
    ServerError(String),
}

impl OauthError {
    /// Returns the OAuth 2.0 error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::ServerError(_) => "server_error",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest => 400,
            Self::ServerError(_) => 500,
        }
    }

    /// Creates the wire error object.
    ///
    /// Server errors carry no detail on the wire; the detail stays in
    /// logs.
    #[must_use]
    pub fn to_error_response(&self) -> ErrorResponse {
        let description = match self {
            Self::InvalidRequest => "invalid request",
            Self::ServerError(_) => "internal server error",
        };
        ErrorResponse {
            error: self.error_code().to_string(),
            error_description: Some(description.to_string()),
        }
    }
}

impl From<StoreError> for OauthError {
    fn from(err: StoreError) -> Self {
        Self::ServerError(err.to_string())
    }
}

impl From<OauthError> for CoreError {
    fn from(err: OauthError) -> Self {
        match err {
            OauthError::InvalidRequest => Self::InvalidGrant,
            OauthError::ServerError(msg) => Self::StoreUnavailable(msg),
        }
    }
}

/// OAuth 2.0 error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub error: String,

    /// Human-readable error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

/// Result type for OAuth operations.
pub type OauthResult<T> = Result<T, OauthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_maps_to_400() {
        let err = OauthError::InvalidRequest;
        assert_eq!(err.error_code(), "invalid_request");
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn server_error_detail_stays_off_the_wire() {
        let err = OauthError::ServerError("redis connection refused".to_string());
        let response = err.to_error_response();
        assert_eq!(response.error, "server_error");
        assert!(!response
            .error_description
            .unwrap()
            .contains("redis"));
    }

    #[test]
    fn error_response_serializes_rfc_shape() {
        let response = OauthError::InvalidRequest.to_error_response();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], "invalid_request");
        assert!(json.get("error_description").is_some());
    }
}
