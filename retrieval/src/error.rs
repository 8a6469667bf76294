//! Error types for top-k retrieval.

use thiserror::Error;

/// Errors that can occur while retrieving context for a query.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Loading the document's snapshot from the store failed.
    #[error(transparent)]
    Store(#[from] policyrag_store::StoreError),

    /// The stored snapshot's JSON failed to decode.
    #[error(transparent)]
    Index(#[from] policyrag_index::IndexError),

    /// Embedding the query text failed.
    #[error("failed to embed query: {0}")]
    Embedding(#[source] anyhow::Error),

    /// No snapshot exists for the requested document.
    #[error("no index found for document {0}")]
    NotFound(String),

    /// `top_k` fell outside the allowed `[1, 40]` range.
    #[error("top_k must be between 1 and 40, got {0}")]
    InvalidTopK(usize),
}

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;
