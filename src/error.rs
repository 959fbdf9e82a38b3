//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.
//!
//! Only caller contract violations surface as `CacheError`. Persistence
//! failures are reported as events and never escape the engine.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors returned to callers of the cache engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key is empty or exceeds the maximum length
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Value exceeds the maximum size
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Store Error Enum ==
/// Failures raised by a persistence backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage key rejected: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

// == Persistence Error Enum ==
/// Failure to save or load a snapshot through the persistence adapter.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// == Command Error Enum ==
/// Rejected shell input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Not a valid number: {0}")]
    InvalidNumber(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_display() {
        let err = CacheError::InvalidKey("key cannot be empty".to_string());
        assert_eq!(err.to_string(), "Invalid key: key cannot be empty");
    }

    #[test]
    fn test_command_error_display() {
        let err = CommandError::Usage("get <key>");
        assert_eq!(err.to_string(), "Usage: get <key>");
    }

    #[test]
    fn test_store_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: StoreError = io.into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn test_persistence_error_from_json() {
        let json_err = serde_json::from_str::<Vec<u8>>("not valid json").unwrap_err();
        let err: PersistenceError = json_err.into();
        assert!(err.to_string().starts_with("Malformed snapshot"));
    }

    #[test]
    fn test_persistence_error_wraps_store_error() {
        let err: PersistenceError = StoreError::Backend("disk full".to_string()).into();
        assert_eq!(err.to_string(), "Storage backend error: disk full");
    }
}
