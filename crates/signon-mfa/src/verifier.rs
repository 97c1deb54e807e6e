//! Retry-limited, lockout-aware verification engine.
//!
//! ## NIST 800-53 Rev5: AC-7 (Unsuccessful Logon Attempts)
//!
//! Per (subject, method) the state machine is NotAttempted → Pending →
//! Blocked. Every call checks Blocked first; otherwise the attempt counter
//! is incremented *before* the comparison runs, so the attempt that
//! crosses the limit is counted even when its code is correct. Blocked
//! holds for the remainder of the session.

use std::collections::HashMap;
use std::sync::Arc;

use signon_core::{EventOutcome, EventType, SecurityEvent, SessionConfig};
use signon_store::CodeStore;

use crate::error::{MfaError, MfaResult};
use crate::method::{MfaContext, MfaMethod};
use crate::types::{attempts_key, blocked_key, MfaAttemptState, MfaMethodType};

/// MFA engine configuration.
#[derive(Debug, Clone)]
pub struct MfaConfig {
    /// Maximum verification attempts per (subject, method) and session.
    pub max_retries: u32,
}

impl Default for MfaConfig {
    fn default() -> Self {
        Self { max_retries: 6 }
    }
}

impl MfaConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the retry limit.
    #[must_use]
    pub const fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Verification engine wrapping the registered method strategies.
pub struct MfaVerifier<S: CodeStore> {
    store: Arc<S>,
    config: MfaConfig,
    session: SessionConfig,
    methods: HashMap<MfaMethodType, Arc<dyn MfaMethod>>,
}

impl<S: CodeStore> MfaVerifier<S> {
    /// Creates a verifier with no registered strategies.
    #[must_use]
    pub fn new(store: Arc<S>, config: MfaConfig, session: SessionConfig) -> Self {
        Self {
            store,
            config,
            session,
            methods: HashMap::new(),
        }
    }

    /// Registers a method strategy, keyed by its discriminator.
    #[must_use]
    pub fn register(mut self, method: Arc<dyn MfaMethod>) -> Self {
        self.methods.insert(method.method_type(), method);
        self
    }

    /// Runs one verification attempt.
    ///
    /// ## Errors
    ///
    /// - [`MfaError::LockedOut`] once the retry limit is reached, checked
    ///   before any comparison, so a correct code does not unlock
    /// - the strategy's own errors otherwise (invalid code, validation,
    ///   missing credential, unsupported journey)
    /// - fatal store errors, surfaced unretried
    pub async fn verify(
        &self,
        context: &MfaContext,
        method_type: MfaMethodType,
        code: &str,
    ) -> MfaResult<()> {
        let method = self.methods.get(&method_type).ok_or_else(|| {
            MfaError::Internal(format!("no strategy for {}", method_type.as_str()))
        })?;

        let attempts = attempts_key(&context.subject, method_type);
        let blocked = blocked_key(&context.subject, method_type);

        let state: Option<MfaAttemptState> = self.store.get(&blocked).await?;
        if state.is_some_and(|s| s.blocked) {
            return Err(MfaError::LockedOut);
        }

        // Count first: the crossing attempt is spent even if its code is
        // correct
        let retry_count = self.store.incr(&attempts, self.session.session_ttl()).await?;
        if retry_count > self.config.max_retries {
            self.store
                .put(
                    &blocked,
                    &MfaAttemptState {
                        retry_count,
                        blocked: true,
                    },
                    self.session.session_ttl(),
                )
                .await?;
            SecurityEvent::new(EventType::MfaLockout, EventOutcome::Failure)
                .with_subject(&context.subject)
                .emit();
            return Err(MfaError::LockedOut);
        }

        match method.verify(context, code).await {
            Ok(()) => {
                self.store.delete(&attempts).await?;
                method.on_success(context).await?;
                SecurityEvent::new(EventType::MfaVerify, EventOutcome::Success)
                    .with_subject(&context.subject)
                    .emit();
                Ok(())
            }
            Err(err) => {
                if !err.is_fatal() {
                    SecurityEvent::new(EventType::MfaVerifyError, EventOutcome::Failure)
                        .with_subject(&context.subject)
                        .emit();
                }
                Err(err)
            }
        }
    }

    /// Returns the current attempt state for `(subject, method)`.
    ///
    /// ## Errors
    ///
    /// Returns an error if the store is unavailable.
    pub async fn attempt_state(
        &self,
        subject: &str,
        method_type: MfaMethodType,
    ) -> MfaResult<MfaAttemptState> {
        if let Some(state) = self
            .store
            .get::<MfaAttemptState>(&blocked_key(subject, method_type))
            .await?
        {
            return Ok(state);
        }

        let retry_count: Option<u32> = self
            .store
            .get(&attempts_key(subject, method_type))
            .await?;
        Ok(MfaAttemptState {
            retry_count: retry_count.unwrap_or(0),
            blocked: false,
        })
    }
}
