//! Mapping of internal errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use policyrag_qa::Envelope;

/// Errors that can surface from an HTTP handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested document has no stored snapshot.
    #[error("document not found: {0}")]
    DocumentNotFound(String),

    /// The uploaded or referenced PDF could not be read or parsed.
    #[error(transparent)]
    Pdf(#[from] policyrag_pdf::PdfError),

    /// Indexing the document failed.
    #[error(transparent)]
    Index(#[from] policyrag_index::IndexError),

    /// Persisting or loading the snapshot failed.
    #[error(transparent)]
    Store(#[from] policyrag_store::StoreError),

    /// Retrieval failed.
    #[error(transparent)]
    Retrieval(#[from] policyrag_retrieval::RetrievalError),

    /// Question answering failed.
    #[error(transparent)]
    Qa(#[from] policyrag_qa::QaError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Pdf(err) => pdf_status(err),
            ApiError::Index(err) => index_status(err),
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Retrieval(err) => retrieval_status(err),
            ApiError::Qa(err) => qa_status(err),
        }
    }
}

/// Only `NotFound` is validation-shaped; parse/IO failures reading an
/// already-located file are server-side.
fn pdf_status(err: &policyrag_pdf::PdfError) -> StatusCode {
    match err {
        policyrag_pdf::PdfError::NotFound(_) => StatusCode::NOT_FOUND,
        policyrag_pdf::PdfError::Parse(_) | policyrag_pdf::PdfError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Only `Validation` (a malformed `ChunkConfig`) is a caller mistake; a
/// corrupt or too-new snapshot, or an embedding failure, is server-side.
fn index_status(err: &policyrag_index::IndexError) -> StatusCode {
    match err {
        policyrag_index::IndexError::Validation(_) => StatusCode::BAD_REQUEST,
        policyrag_index::IndexError::Embedding(_)
        | policyrag_index::IndexError::CorruptIndex(_)
        | policyrag_index::IndexError::VersionTooNew { .. }
        | policyrag_index::IndexError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `NotFound` and `InvalidTopK` are caller-facing; everything else (store,
/// decode, embedding failures) is server-side.
fn retrieval_status(err: &policyrag_retrieval::RetrievalError) -> StatusCode {
    match err {
        policyrag_retrieval::RetrievalError::NotFound(_) => StatusCode::NOT_FOUND,
        policyrag_retrieval::RetrievalError::InvalidTopK(_) => StatusCode::BAD_REQUEST,
        policyrag_retrieval::RetrievalError::Store(_)
        | policyrag_retrieval::RetrievalError::Index(_)
        | policyrag_retrieval::RetrievalError::Embedding(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Delegates to the wrapped retrieval error so a `NotFound` doesn't get
/// flattened into a generic 500 once it's behind `QaError::Retrieval`.
fn qa_status(err: &policyrag_qa::QaError) -> StatusCode {
    match err {
        policyrag_qa::QaError::Retrieval(inner) => retrieval_status(inner),
        policyrag_qa::QaError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let envelope: Envelope<()> = Envelope::failure(self.to_string());
        (status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_index_is_server_error_not_validation() {
        let err = ApiError::Index(policyrag_index::IndexError::CorruptIndex("bad".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_chunk_config_is_bad_request() {
        let err = ApiError::Index(policyrag_index::IndexError::Validation("bad".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn qa_wrapped_not_found_is_404_not_500() {
        let err = ApiError::Qa(policyrag_qa::QaError::Retrieval(
            policyrag_retrieval::RetrievalError::NotFound("doc-1".to_string()),
        ));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn qa_wrapped_invalid_top_k_is_bad_request() {
        let err = ApiError::Qa(policyrag_qa::QaError::Retrieval(
            policyrag_retrieval::RetrievalError::InvalidTopK(0),
        ));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn generation_failure_is_server_error() {
        let err = ApiError::Qa(policyrag_qa::QaError::Generation(anyhow::anyhow!("boom")));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
