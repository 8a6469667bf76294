//! Error types for question answering over a retrieved document.

use thiserror::Error;

/// Errors that can occur while answering a question about a document.
#[derive(Debug, Error)]
pub enum QaError {
    /// Retrieving context chunks failed.
    #[error(transparent)]
    Retrieval(#[from] policyrag_retrieval::RetrievalError),

    /// The language model failed to generate a response.
    #[error("generation failed: {0}")]
    Generation(#[source] anyhow::Error),
}

/// Result type alias for question-answering operations.
pub type Result<T> = std::result::Result<T, QaError>;
