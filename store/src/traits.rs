//! The store-backend-agnostic contract every persistence layer implements.

use crate::error::Result;

/// A persisted snapshot's two JSON payloads, exactly as handed to [`IndexStore::put`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredIndex {
    /// JSON-encoded [`policyrag_index::IndexSnapshot`].
    pub nodes_json: String,
    /// JSON-encoded metadata (source file name, page count, chunk config name, timestamps).
    pub metadata_json: String,
}

/// One row of [`IndexStore::list`]: a document's id and its metadata payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    /// Document identifier, the same string passed to [`IndexStore::put`].
    pub doc_id: String,
    /// JSON-encoded metadata for that document.
    pub metadata_json: String,
}

/// Persists and retrieves document index snapshots by `doc_id`.
///
/// Implementations store the node JSON and metadata JSON as two separate
/// fields so metadata can be listed without pulling every node and
/// embedding across the wire.
#[async_trait::async_trait]
pub trait IndexStore: Send + Sync {
    /// Stores `nodes_json`/`metadata_json` under `doc_id`, replacing any
    /// existing entry. `ttl_seconds`, if set, expires the entry after that
    /// many seconds.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StoreError`] on backend failure or timeout.
    async fn put(
        &self,
        doc_id: &str,
        nodes_json: &str,
        metadata_json: &str,
        ttl_seconds: Option<u64>,
    ) -> Result<()>;

    /// Loads the stored snapshot for `doc_id`, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StoreError`] on backend failure, timeout, or
    /// a stored record missing one of its two fields.
    async fn get(&self, doc_id: &str) -> Result<Option<StoredIndex>>;

    /// True if `doc_id` has a stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StoreError`] on backend failure or timeout.
    async fn exists(&self, doc_id: &str) -> Result<bool>;

    /// Deletes `doc_id`'s snapshot. Returns `true` if something was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StoreError`] on backend failure or timeout.
    async fn delete(&self, doc_id: &str) -> Result<bool>;

    /// Lists every stored document's id and metadata.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StoreError`] on backend failure or timeout.
    async fn list(&self) -> Result<Vec<DocumentSummary>>;
}
