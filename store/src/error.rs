//! Error types for snapshot persistence.

use thiserror::Error;

/// Errors that can occur while persisting or loading a document snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying Redis client returned an error.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// An operation did not complete within its timeout.
    #[error("store operation timed out after {seconds}s")]
    Timeout {
        /// Configured timeout, in seconds.
        seconds: u64,
    },

    /// A stored hash was missing required fields, or a field was not valid UTF-8 JSON text.
    #[error("stored document {doc_id} is corrupt: {reason}")]
    Corrupt {
        /// Document the corrupt record belongs to.
        doc_id: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
