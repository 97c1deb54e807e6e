//! # signon-protocol-oauth
//!
//! OAuth2 credential exchange for the sign-on core: the single-use
//! authorization-code grant and the bearer access tokens it issues.
//!
//! Client authentication (private-key-JWT assertion) is validated by an
//! external collaborator before the exchanger runs; this crate assumes an
//! authenticated client and owns only the code-to-token protocol:
//! single-use semantics, expiry, replay resistance, and the deliberately
//! generic error responses that keep missing, used, and expired codes
//! indistinguishable to callers.
//!
//! ## RFC 6749
//!
//! The exchange implements the authorization-code grant response shapes of
//! RFC 6749 §4.1.3–4.1.4 and §5.2, without refresh tokens.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod exchange;
pub mod types;

pub use error::{ErrorResponse, OauthError, OauthResult};
pub use exchange::{AuthorizationCodeExchanger, ExchangeConfig};
pub use types::{AccessTokenRecord, AuthorizationCodeRecord, TokenResponse};
