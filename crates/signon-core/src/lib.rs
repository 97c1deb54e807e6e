//! # signon-core
//!
//! Core utilities, configuration, and error handling for the sign-on
//! credential-exchange core.
//!
//! This crate provides the cross-cutting error taxonomy, session
//! configuration, and security-event types used by the protocol, MFA,
//! and delegation crates.
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - AU-2: Event logging framework
//! - SI-11: Error handling

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod event;

pub use config::SessionConfig;
pub use error::{CoreError, CoreResult};
pub use event::{EventOutcome, EventType, SecurityEvent};
