//! Code store trait.

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::StoreResult;

/// TTL key-value store for authorization codes, one-time codes, MFA attempt
/// state, and delegated-authorization correlation state.
///
/// Implementations must be thread-safe and support concurrent access: the
/// same authorization code or attempt counter may be touched by multiple
/// in-flight requests.
///
/// Values are serialized by the implementation; callers work with any type
/// implementing `Serialize` + `DeserializeOwned`.
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Stores a value under `key` with the given TTL.
    async fn put<T>(&self, key: &str, value: &T, ttl: Duration) -> StoreResult<()>
    where
        T: Serialize + Sync;

    /// Gets the value stored under `key`.
    ///
    /// Returns `None` if the key does not exist or has expired.
    async fn get<T>(&self, key: &str) -> StoreResult<Option<T>>
    where
        T: DeserializeOwned + Send;

    /// Deletes the value under `key`.
    ///
    /// Returns `Ok(())` even if the key does not exist.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Atomically increments the counter under `key` and returns the new
    /// value.
    ///
    /// Creates the counter at 1 with the given TTL if absent. The TTL is
    /// applied on creation only; later increments do not extend it.
    async fn incr(&self, key: &str, ttl: Duration) -> StoreResult<u32>;

    /// Atomically replaces the value under `key` with `new` only if the
    /// currently stored value equals `expected`.
    ///
    /// Returns `true` if the swap was applied. Returns `false` if the key
    /// is absent, expired, or holds a different value, including when a
    /// concurrent caller won the swap first. The remaining TTL of the key
    /// is preserved.
    ///
    /// This is the primitive behind "mark used only if not already used";
    /// callers must not substitute a read-then-write sequence.
    async fn swap_if_eq<T>(&self, key: &str, expected: &T, new: &T) -> StoreResult<bool>
    where
        T: Serialize + Sync;
}
