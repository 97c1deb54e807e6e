//! SMS one-time code strategy and dispatch.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use signon_core::{EventOutcome, EventType, SecurityEvent};
use signon_crypto::random::generate_numeric_code;
use signon_store::CodeStore;

use crate::error::{MfaError, MfaResult};
use crate::method::{MfaContext, MfaMethod};
use crate::types::{otp_key, JourneyType, MfaMethodType, NotificationPurpose};

const OTP_DIGITS: usize = 6;

/// Delivery seam for outbound one-time codes.
///
/// Queue dispatch of user notifications is an external collaborator; this
/// trait is the boundary the sender hands completed codes across.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers a one-time code to the destination for the given purpose.
    async fn deliver(
        &self,
        destination: &str,
        purpose: NotificationPurpose,
        code: &str,
    ) -> MfaResult<()>;
}

/// Generates, stores, and dispatches one-time codes.
pub struct OtpSender<S: CodeStore, N: NotificationSink> {
    store: Arc<S>,
    sink: Arc<N>,
    code_ttl: Duration,
}

impl<S: CodeStore, N: NotificationSink> OtpSender<S, N> {
    /// Creates a sender with the given code lifetime.
    #[must_use]
    pub fn new(store: Arc<S>, sink: Arc<N>, code_ttl: Duration) -> Self {
        Self {
            store,
            sink,
            code_ttl,
        }
    }

    /// Generates a fresh six-digit code, stores it under
    /// `(subject, purpose)`, and hands it to the notification sink.
    ///
    /// A failed later comparison does not regenerate the code; the stored
    /// value stays valid until its TTL lapses or verification consumes it.
    ///
    /// ## Errors
    ///
    /// Returns an error if the store or the sink fails.
    pub async fn send(
        &self,
        subject: &str,
        destination: &str,
        purpose: NotificationPurpose,
    ) -> MfaResult<()> {
        let code = generate_numeric_code(OTP_DIGITS);
        self.store
            .put(&otp_key(subject, purpose), &code, self.code_ttl)
            .await?;
        self.sink.deliver(destination, purpose, &code).await?;

        SecurityEvent::new(EventType::OtpSent, EventOutcome::Success)
            .with_subject(subject)
            .emit();
        Ok(())
    }
}

/// SMS one-time code verification strategy.
///
/// Only valid for the registration journey: SMS is not a sign-in factor in
/// this deployment, and a sign-in attempt is rejected outright with a
/// fatal error before any comparison. This restriction is intentional.
pub struct SmsOtpMethod<S: CodeStore> {
    store: Arc<S>,
    purpose: NotificationPurpose,
    test_client_code: Option<String>,
}

impl<S: CodeStore> SmsOtpMethod<S> {
    /// Creates the strategy for phone-number verification codes.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            purpose: NotificationPurpose::VerifyPhoneNumber,
            test_client_code: None,
        }
    }

    /// Enables the designated-test-client bypass with a fixed code value.
    ///
    /// Explicitly opt-in; every use of the bypass is logged.
    #[must_use]
    pub fn with_test_client_code(mut self, code: impl Into<String>) -> Self {
        self.test_client_code = Some(code.into());
        self
    }

    async fn expected_code(&self, context: &MfaContext) -> MfaResult<Option<String>> {
        if context.is_test_client {
            if let Some(code) = &self.test_client_code {
                tracing::warn!(
                    subject = %context.subject,
                    "test client OTP bypass in use"
                );
                return Ok(Some(code.clone()));
            }
        }
        Ok(self
            .store
            .get(&otp_key(&context.subject, self.purpose))
            .await?)
    }
}

#[async_trait]
impl<S: CodeStore> MfaMethod for SmsOtpMethod<S> {
    fn method_type(&self) -> MfaMethodType {
        MfaMethodType::Sms
    }

    async fn verify(&self, context: &MfaContext, code: &str) -> MfaResult<()> {
        if context.journey == JourneyType::SignIn {
            return Err(MfaError::SmsSignInUnsupported);
        }
        if code.is_empty() {
            return Err(MfaError::Validation("code must not be empty".to_string()));
        }

        match self.expected_code(context).await? {
            Some(expected) if constant_time_eq(expected.as_bytes(), code.as_bytes()) => Ok(()),
            _ => Err(MfaError::InvalidCode),
        }
    }

    async fn on_success(&self, context: &MfaContext) -> MfaResult<()> {
        // Consume the stored code; it is single-use
        self.store
            .delete(&otp_key(&context.subject, self.purpose))
            .await?;
        Ok(())
    }
}

/// Constant-time comparison of two byte slices.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
