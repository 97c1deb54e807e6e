//! # signon-mfa
//!
//! Multi-factor verification engine for the sign-on credential core.
//!
//! A single retry/lockout state machine wraps per-method verification
//! strategies: every attempt is counted *before* the code comparison runs,
//! and once a session crosses the retry limit for a method, further
//! attempts are rejected without comparison for the remainder of the
//! session. A correct code does not unlock a blocked method.
//!
//! Two strategies are provided:
//!
//! - [`TotpMethod`]: authenticator-app codes (RFC 6238 semantics with an
//!   asymmetric look-around window biased toward future drift)
//! - [`SmsOtpMethod`]: single-shot SMS codes, registration journey only
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - IA-2: Identification and Authentication
//! - AC-7: Unsuccessful Logon Attempts

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod credential;
pub mod error;
pub mod method;
pub mod sms;
pub mod totp;
pub mod types;
pub mod verifier;

pub use credential::CredentialProvider;
pub use error::{MfaError, MfaResult};
pub use method::{MfaContext, MfaMethod};
pub use sms::{NotificationSink, OtpSender, SmsOtpMethod};
pub use totp::{TotpConfig, TotpMethod};
pub use types::{JourneyType, MfaAttemptState, MfaMethodType, NotificationPurpose, TotpSecret};
pub use verifier::{MfaConfig, MfaVerifier};
