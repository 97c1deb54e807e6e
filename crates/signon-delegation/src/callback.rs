//! Delegated-authorization callback validation.

use std::collections::HashMap;

use signon_core::{CoreError, CoreResult, EventOutcome, EventType, SecurityEvent};
use signon_store::CodeStore;
use thiserror::Error;

use crate::request::{state_key, ExternalAuthorizationRequestBuilder};

/// Reasons a provider callback is rejected.
///
/// Each variant is reported distinctly: a rejected callback is never
/// auto-retried, and the caller needs to know which contract the provider
/// broke. Upstream errors carry only the provider's error *code*; the
/// description is deliberately dropped so provider-internal detail does
/// not leak through this service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackRejection {
    /// The callback carried no query parameters at all.
    #[error("no query parameters in authorization response")]
    MissingParams,

    /// The provider returned an explicit error.
    #[error("authorization response error: {code}")]
    UpstreamError {
        /// The provider's error code.
        code: String,
    },

    /// The callback carried no `state` parameter.
    #[error("authorization response missing state")]
    MissingState,

    /// The callback carried no `code` parameter.
    #[error("authorization response missing code")]
    MissingCode,

    /// The `state` parameter did not match the session's stored value.
    #[error("authorization response state mismatch")]
    StateMismatch,
}

impl CallbackRejection {
    /// Returns whether this rejection is the CSRF-state failure, which
    /// maps to [`CoreError::StateMismatch`] in the core taxonomy.
    #[must_use]
    pub const fn is_state_mismatch(&self) -> bool {
        matches!(self, Self::StateMismatch)
    }
}

impl<S: CodeStore> ExternalAuthorizationRequestBuilder<S> {
    /// Validates a provider callback against the session's stored state.
    ///
    /// Checks run in order: no parameters, explicit `error` parameter,
    /// missing `state`, missing `code`, and finally an exact string match
    /// of `state` against the stored value. Returns `None` only when every
    /// check passes.
    ///
    /// ## Errors
    ///
    /// Returns a fatal error if the store is unavailable; store failures
    /// are not expressible as a rejection.
    pub async fn validate_response(
        &self,
        params: &HashMap<String, String>,
        session_id: &str,
    ) -> CoreResult<Option<CallbackRejection>> {
        if params.is_empty() {
            return Ok(Some(self.rejected(CallbackRejection::MissingParams)));
        }

        if let Some(code) = params.get("error") {
            // Only the upstream code survives; the description is dropped
            return Ok(Some(self.rejected(CallbackRejection::UpstreamError {
                code: code.clone(),
            })));
        }

        let Some(state) = params.get("state") else {
            return Ok(Some(self.rejected(CallbackRejection::MissingState)));
        };

        if !params.contains_key("code") {
            return Ok(Some(self.rejected(CallbackRejection::MissingCode)));
        }

        let stored: Option<String> = self
            .store
            .get(&state_key(session_id))
            .await
            .map_err(|e| CoreError::StoreUnavailable(e.to_string()))?;

        match stored {
            Some(stored) if stored == *state => {
                SecurityEvent::new(EventType::DelegatedCallback, EventOutcome::Success).emit();
                Ok(None)
            }
            _ => Ok(Some(self.rejected(CallbackRejection::StateMismatch))),
        }
    }

    fn rejected(&self, rejection: CallbackRejection) -> CallbackRejection {
        tracing::debug!(rejection = %rejection, "delegated callback rejected");
        SecurityEvent::new(EventType::DelegatedCallbackError, EventOutcome::Failure).emit();
        rejection
    }
}
