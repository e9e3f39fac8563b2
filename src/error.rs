//! Error types for the caching client
//!
//! Provides the caller-facing error taxonomy using thiserror, and the
//! translation of store-reported error replies into it.

use thiserror::Error;

// == Transport Error ==
/// Connectivity or protocol failure reported by an executor.
///
/// Executors return this only when a command could not be carried out at
/// all. Absence and type errors travel back as replies instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    /// Creates a new TransportError from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<redis::RedisError> for TransportError {
    fn from(err: redis::RedisError) -> Self {
        Self(err.to_string())
    }
}

// == Cache Error Enum ==
/// Unified error type for the caching client.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key, hash field or sorted-set member absent where presence was required
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Stored bytes do not parse as the requested type, or the key holds
    /// an incompatible collection type
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Structured value (de)serialization failed
    #[error("Decode error: {0}")]
    Decode(String),

    /// The executor could not reach the store
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl CacheError {
    // == Server Reply Translation ==
    /// Translates an error reply sent by the store.
    ///
    /// `WRONGTYPE` and the integer/float parse family become `TypeMismatch`.
    /// Everything else is a protocol-level failure and becomes `Transport`.
    pub fn from_server(message: &str) -> Self {
        if message.starts_with("WRONGTYPE") || is_value_error(message) {
            CacheError::TypeMismatch(message.to_string())
        } else {
            CacheError::Transport(TransportError::new(message))
        }
    }

    /// Returns true if this error reports an absent key, field or member.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::KeyNotFound(_))
    }

    /// Returns true if this error came from the transport layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, CacheError::Transport(_))
    }
}

fn is_value_error(message: &str) -> bool {
    message.contains("not an integer")
        || message.contains("not a valid float")
        || message.contains("would overflow")
}

// == Result Type Alias ==
/// Convenience Result type for the caching client.
pub type Result<T> = std::result::Result<T, CacheError>;
