//! Redis code store implementation.

use std::time::Duration;

use async_trait::async_trait;
use fred::interfaces::LuaInterface;
use fred::prelude::*;
use serde::{de::DeserializeOwned, Serialize};
use signon_store::{CodeStore, StoreError, StoreResult};

use crate::config::RedisConfig;
use crate::error::{from_redis_error, from_serde_error};

/// Compare-and-swap: replace KEYS[1] with ARGV[2] only if its current value
/// equals ARGV[1], keeping the remaining TTL. Runs server-side as one step.
const SWAP_IF_EQ_SCRIPT: &str = r"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    redis.call('SET', KEYS[1], ARGV[2], 'KEEPTTL')
    return 1
else
    return 0
end
";

/// Redis-based [`CodeStore`] provider.
pub struct RedisCodeStore {
    client: Client,
    config: RedisConfig,
}

impl RedisCodeStore {
    /// Creates a new Redis code store.
    ///
    /// ## Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub async fn new(config: RedisConfig) -> StoreResult<Self> {
        let redis_config = Config::from_url(&config.connection_url())
            .map_err(|e| StoreError::Configuration(e.to_string()))?;

        let client = Client::new(
            redis_config,
            None,
            None,
            Some(ReconnectPolicy::new_exponential(0, 1000, 30_000, 2)),
        );

        client.init().await.map_err(from_redis_error)?;

        Ok(Self { client, config })
    }

    /// Returns the underlying Redis client.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Formats a key with the configured prefix.
    fn key(&self, key: &str) -> String {
        self.config.prefixed_key(key)
    }
}

/// Safely convert seconds to i64 for Redis expiration.
#[allow(clippy::cast_possible_wrap)]
const fn seconds_to_i64(seconds: u64) -> i64 {
    seconds as i64
}

/// Safely narrow a Redis counter value.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn counter_to_u32(count: i64) -> u32 {
    if count < 0 {
        0
    } else if count > u32::MAX as i64 {
        u32::MAX
    } else {
        count as u32
    }
}

#[async_trait]
impl CodeStore for RedisCodeStore {
    async fn put<T>(&self, key: &str, value: &T, ttl: Duration) -> StoreResult<()>
    where
        T: Serialize + Sync,
    {
        let key = self.key(key);
        let serialized = serde_json::to_string(value).map_err(from_serde_error)?;
        let seconds = seconds_to_i64(ttl.as_secs().max(1));

        self.client
            .set::<(), _, _>(&key, serialized, Some(Expiration::EX(seconds)), None, false)
            .await
            .map_err(from_redis_error)
    }

    async fn get<T>(&self, key: &str) -> StoreResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        let key = self.key(key);
        let value: Option<String> = self.client.get(&key).await.map_err(from_redis_error)?;

        match value {
            Some(v) => {
                let parsed: T = serde_json::from_str(&v).map_err(from_serde_error)?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let key = self.key(key);
        self.client
            .del::<(), _>(&key)
            .await
            .map_err(from_redis_error)
    }

    async fn incr(&self, key: &str, ttl: Duration) -> StoreResult<u32> {
        let key = self.key(key);
        let count: i64 = self.client.incr(&key).await.map_err(from_redis_error)?;

        // First increment created the key; bound its lifetime
        if count == 1 {
            let seconds = seconds_to_i64(ttl.as_secs().max(1));
            let _: bool = self
                .client
                .expire(&key, seconds, None)
                .await
                .map_err(from_redis_error)?;
        }

        Ok(counter_to_u32(count))
    }

    async fn swap_if_eq<T>(&self, key: &str, expected: &T, new: &T) -> StoreResult<bool>
    where
        T: Serialize + Sync,
    {
        let key = self.key(key);
        let expected = serde_json::to_string(expected).map_err(from_serde_error)?;
        let new = serde_json::to_string(new).map_err(from_serde_error)?;

        let swapped: i64 = self
            .client
            .eval(SWAP_IF_EQ_SCRIPT, vec![key], vec![expected, new])
            .await
            .map_err(from_redis_error)?;

        Ok(swapped == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_narrowing() {
        assert_eq!(counter_to_u32(-1), 0);
        assert_eq!(counter_to_u32(5), 5);
        assert_eq!(counter_to_u32(i64::MAX), u32::MAX);
    }

    #[test]
    fn swap_script_shape() {
        // KEEPTTL is what preserves the remaining lifetime across the swap
        assert!(SWAP_IF_EQ_SCRIPT.contains("KEEPTTL"));
        assert!(SWAP_IF_EQ_SCRIPT.contains("GET"));
    }
}
