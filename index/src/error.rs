//! Error types for hierarchical indexing and snapshot codec operations.

use thiserror::Error;

/// Errors that can occur while building or decoding a document index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A `ChunkConfig` field violated its documented bounds.
    #[error("invalid chunk configuration: {0}")]
    Validation(String),

    /// The embedding model failed for one or more child nodes.
    #[error("embedding failed: {0}")]
    Embedding(#[source] anyhow::Error),

    /// The snapshot JSON could not be parsed at all.
    #[error("corrupt index snapshot: {0}")]
    CorruptIndex(String),

    /// The snapshot declares a `version` newer than this build understands.
    #[error("snapshot version {found} is newer than the supported version {supported}")]
    VersionTooNew {
        /// Version found in the snapshot.
        found: u32,
        /// Highest version this build can decode.
        supported: u32,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
