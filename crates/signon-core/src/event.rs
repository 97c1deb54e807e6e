//! Security-event logging.
//!
//! ## NIST 800-53 Rev5: AU-2 (Event Logging)
//!
//! This module provides structured event types for security-relevant
//! operations in the credential core. Events are emitted through `tracing`;
//! redaction and signing of the downstream audit trail belong to an
//! external pipeline.
//!
//! Events never carry secrets: no authorization codes, OTP codes, TOTP
//! secrets, or state values appear in event fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type categories emitted by the credential core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Authorization code exchanged for an access token.
    CodeToToken,
    /// Authorization-code exchange failed.
    CodeToTokenError,
    /// MFA code verified.
    MfaVerify,
    /// MFA verification failed.
    MfaVerifyError,
    /// MFA retry limit reached; session blocked for the method.
    MfaLockout,
    /// One-time code generated and dispatched.
    OtpSent,
    /// Delegated-authorization request constructed.
    DelegatedRequest,
    /// Delegated-authorization callback accepted.
    DelegatedCallback,
    /// Delegated-authorization callback rejected.
    DelegatedCallbackError,
}

impl EventType {
    /// Returns the event name used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CodeToToken => "CODE_TO_TOKEN",
            Self::CodeToTokenError => "CODE_TO_TOKEN_ERROR",
            Self::MfaVerify => "MFA_VERIFY",
            Self::MfaVerifyError => "MFA_VERIFY_ERROR",
            Self::MfaLockout => "MFA_LOCKOUT",
            Self::OtpSent => "OTP_SENT",
            Self::DelegatedRequest => "DELEGATED_REQUEST",
            Self::DelegatedCallback => "DELEGATED_CALLBACK",
            Self::DelegatedCallbackError => "DELEGATED_CALLBACK_ERROR",
        }
    }
}

/// Outcome of the operation an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventOutcome {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// A security-relevant event.
///
/// ## NIST 800-53 Rev5: AU-3 (Content of Audit Records)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    /// Unique event id.
    pub id: Uuid,
    /// Event type.
    pub event_type: EventType,
    /// Outcome.
    pub outcome: EventOutcome,
    /// Subject identifier, when known.
    pub subject: Option<String>,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
}

impl SecurityEvent {
    /// Creates a new event for the given type and outcome.
    #[must_use]
    pub fn new(event_type: EventType, outcome: EventOutcome) -> Self {
        Self {
            id: Uuid::now_v7(),
            event_type,
            outcome,
            subject: None,
            timestamp: Utc::now(),
        }
    }

    /// Attaches the subject identifier.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Emits the event through `tracing`.
    pub fn emit(&self) {
        match self.outcome {
            EventOutcome::Success => tracing::info!(
                event = self.event_type.as_str(),
                event_id = %self.id,
                subject = self.subject.as_deref().unwrap_or("-"),
                "security event"
            ),
            EventOutcome::Failure => tracing::warn!(
                event = self.event_type.as_str(),
                event_id = %self.id,
                subject = self.subject.as_deref().unwrap_or("-"),
                "security event"
            ),
        }
    }
}
