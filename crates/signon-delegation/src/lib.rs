//! # signon-delegation
//!
//! Delegated identity-verification handoff.
//!
//! When a journey requires identity proofing, the session is handed to an
//! external identity-verification provider with a signed-then-encrypted
//! request object (compact JWS wrapped in compact JWE), and the provider's
//! callback is correlated against a session-scoped random state value
//! stored with the session's TTL.
//!
//! Signing and encryption are both mandatory and ordered (sign first,
//! encrypt the signed token), using the same custody oracle and recipient
//! key plumbing as the rest of the credential core.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod callback;
pub mod config;
pub mod request;

pub use callback::CallbackRejection;
pub use config::DelegationConfig;
pub use request::{ExternalAuthorizationRequestBuilder, RequestParams};
