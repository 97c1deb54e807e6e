//! In-memory code store.
//!
//! Single-process provider used by unit and integration tests. Values are
//! held as JSON strings, matching the serialization convention of the Redis
//! provider, so swap comparisons behave identically across providers.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::provider::CodeStore;

struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory [`CodeStore`] provider.
///
/// Expired entries are dropped lazily on access. All mutating operations
/// run under a single mutex, which gives the atomicity the contract
/// requires within one process.
#[derive(Default)]
pub struct InMemoryCodeStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryCodeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }

    /// Returns whether the store holds no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn to_json<T: Serialize>(value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn from_json<T: DeserializeOwned>(value: &str) -> StoreResult<T> {
    serde_json::from_str(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[async_trait]
impl CodeStore for InMemoryCodeStore {
    async fn put<T>(&self, key: &str, value: &T, ttl: Duration) -> StoreResult<()>
    where
        T: Serialize + Sync,
    {
        let serialized = to_json(value)?;
        self.entries.lock().insert(
            key.to_string(),
            Entry {
                value: serialized,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn get<T>(&self, key: &str) -> StoreResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
            return Ok(None);
        }

        match entries.get(key) {
            Some(entry) => Ok(Some(from_json(&entry.value)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn incr(&self, key: &str, ttl: Duration) -> StoreResult<u32> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        if let Some(entry) = entries.get_mut(key) {
            if !entry.is_expired(now) {
                let current: u32 = entry
                    .value
                    .parse()
                    .map_err(|_| StoreError::Internal(format!("key '{key}' is not a counter")))?;
                let next = current.saturating_add(1);
                entry.value = next.to_string();
                return Ok(next);
            }
        }

        entries.insert(
            key.to_string(),
            Entry {
                value: "1".to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(1)
    }

    async fn swap_if_eq<T>(&self, key: &str, expected: &T, new: &T) -> StoreResult<bool>
    where
        T: Serialize + Sync,
    {
        let expected = to_json(expected)?;
        let new = to_json(new)?;

        let now = Instant::now();
        let mut entries = self.entries.lock();

        match entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now) && entry.value == expected => {
                // TTL preserved: only the value is replaced
                entry.value = new;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    const TTL: Duration = Duration::from_secs(60);

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Record {
        name: String,
        used: bool,
    }

    #[tokio::test]
    async fn put_get_round_trip() {
        let store = InMemoryCodeStore::new();
        let record = Record {
            name: "a".to_string(),
            used: false,
        };

        store.put("k", &record, TTL).await.unwrap();
        let loaded: Option<Record> = store.get("k").await.unwrap();
        assert_eq!(loaded, Some(record));
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = InMemoryCodeStore::new();
        let loaded: Option<Record> = store.get("missing").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn expired_entry_is_dropped() {
        let store = InMemoryCodeStore::new();
        store
            .put("k", &"v".to_string(), Duration::from_secs(0))
            .await
            .unwrap();

        let loaded: Option<String> = store.get("k").await.unwrap();
        assert!(loaded.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn incr_creates_then_counts() {
        let store = InMemoryCodeStore::new();
        assert_eq!(store.incr("c", TTL).await.unwrap(), 1);
        assert_eq!(store.incr("c", TTL).await.unwrap(), 2);
        assert_eq!(store.incr("c", TTL).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn swap_if_eq_applies_once() {
        let store = InMemoryCodeStore::new();
        let before = Record {
            name: "a".to_string(),
            used: false,
        };
        let after = Record {
            name: "a".to_string(),
            used: true,
        };

        store.put("k", &before, TTL).await.unwrap();

        assert!(store.swap_if_eq("k", &before, &after).await.unwrap());
        // Second swap loses: the stored value no longer matches `expected`
        assert!(!store.swap_if_eq("k", &before, &after).await.unwrap());

        let loaded: Option<Record> = store.get("k").await.unwrap();
        assert_eq!(loaded, Some(after));
    }

    #[tokio::test]
    async fn swap_if_eq_on_missing_key_fails() {
        let store = InMemoryCodeStore::new();
        let a = "a".to_string();
        let b = "b".to_string();
        assert!(!store.swap_if_eq("missing", &a, &b).await.unwrap());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemoryCodeStore::new();
        store.put("k", &"v".to_string(), TTL).await.unwrap();
        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();

        let loaded: Option<String> = store.get("k").await.unwrap();
        assert!(loaded.is_none());
    }
}
