//! # signon-store
//!
//! Store abstraction for the sign-on credential core.
//!
//! This crate defines the [`CodeStore`] contract used for authorization
//! codes, one-time codes, MFA attempt counters, and delegated-authorization
//! state. The production implementation is Redis-based (see
//! `signon-store-redis`); an in-memory provider is included for tests.
//!
//! ## Atomicity
//!
//! Two operations are atomic by contract, not convention:
//!
//! - [`CodeStore::incr`]: counter increments under concurrent attempts
//! - [`CodeStore::swap_if_eq`]: conditional replace, the primitive behind
//!   single-use code redemption
//!
//! A plain read-then-write is not sufficient for either under concurrent
//! requests.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod memory;
pub mod provider;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryCodeStore;
pub use provider::CodeStore;
