//! Session-scoped configuration.
//!
//! Configuration is an explicit value threaded through constructors; there
//! is no globally accessible configuration singleton.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session-scoped configuration shared by the MFA and delegation crates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in seconds. Bounds the TTL of per-session state:
    /// MFA attempt counters, lockout markers, and delegated-authorization
    /// correlation state.
    pub session_ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 3600,
        }
    }
}

impl SessionConfig {
    /// Creates a new session configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the session lifetime in seconds.
    #[must_use]
    pub const fn session_ttl_secs(mut self, secs: u64) -> Self {
        self.session_ttl_secs = secs;
        self
    }

    /// Returns the session lifetime as a [`Duration`].
    #[must_use]
    pub const fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}
