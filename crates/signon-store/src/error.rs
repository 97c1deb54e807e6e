//! Store error types.

use std::fmt;

/// Store operation errors.
///
/// Store failures are fatal to the calling operation: mutations against the
/// store (code consumption, counter increments) are not safely repeatable,
/// so callers surface these as server errors rather than retrying.
#[derive(Debug)]
pub enum StoreError {
    /// Connection to the store backend failed.
    Connection(String),
    /// Serialization/deserialization error.
    Serialization(String),
    /// Invalid store configuration.
    Configuration(String),
    /// Internal store error.
    Internal(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(msg) => write!(f, "store connection error: {msg}"),
            Self::Serialization(msg) => write!(f, "store serialization error: {msg}"),
            Self::Configuration(msg) => write!(f, "store configuration error: {msg}"),
            Self::Internal(msg) => write!(f, "internal store error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::Connection("refused".to_string());
        assert!(err.to_string().contains("refused"));

        let err = StoreError::Serialization("bad json".to_string());
        assert!(err.to_string().contains("bad json"));
    }
}
