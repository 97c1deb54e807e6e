//! # signon-store-redis
//!
//! Redis implementation of the sign-on code store.
//!
//! This crate implements the [`signon_store::CodeStore`] contract using the
//! `fred` client. The conditional-replace primitive is a Lua script, so the
//! compare and the write execute as one step on the server; single-use code
//! redemption relies on this.
//!
//! ## Example
//!
//! ```ignore
//! use signon_store::CodeStore;
//! use signon_store_redis::{RedisCodeStore, RedisConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RedisConfig::default().host("localhost").port(6379);
//!     let store = RedisCodeStore::new(config).await?;
//!
//!     store.put("key", &"value", Duration::from_secs(300)).await?;
//!     let value: Option<String> = store.get("key").await?;
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod provider;

pub use config::RedisConfig;
pub use provider::RedisCodeStore;
