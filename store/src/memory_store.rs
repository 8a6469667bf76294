//! In-memory [`IndexStore`] for tests and local development without Redis.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::error::Result;
use crate::traits::{DocumentSummary, IndexStore, StoredIndex};

struct Entry {
    nodes_json: String,
    metadata_json: String,
    expires_at: Option<Instant>,
}

/// `IndexStore` backed by a `HashMap` guarded by a `tokio::sync::RwLock`.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl IndexStore for MemoryStore {
    async fn put(
        &self,
        doc_id: &str,
        nodes_json: &str,
        metadata_json: &str,
        ttl_seconds: Option<u64>,
    ) -> Result<()> {
        let mut documents = self.documents.write().await;
        documents.insert(
            doc_id.to_string(),
            Entry {
                nodes_json: nodes_json.to_string(),
                metadata_json: metadata_json.to_string(),
                expires_at: ttl_seconds.map(|s| Instant::now() + Duration::from_secs(s)),
            },
        );
        Ok(())
    }

    async fn get(&self, doc_id: &str) -> Result<Option<StoredIndex>> {
        let mut documents = self.documents.write().await;
        if is_expired(documents.get(doc_id)) {
            documents.remove(doc_id);
        }
        Ok(documents.get(doc_id).map(|entry| StoredIndex {
            nodes_json: entry.nodes_json.clone(),
            metadata_json: entry.metadata_json.clone(),
        }))
    }

    async fn exists(&self, doc_id: &str) -> Result<bool> {
        Ok(self.get(doc_id).await?.is_some())
    }

    async fn delete(&self, doc_id: &str) -> Result<bool> {
        let mut documents = self.documents.write().await;
        Ok(documents.remove(doc_id).is_some())
    }

    async fn list(&self) -> Result<Vec<DocumentSummary>> {
        let mut documents = self.documents.write().await;
        documents.retain(|_, entry| !is_expired(Some(entry)));
        Ok(documents
            .iter()
            .map(|(doc_id, entry)| DocumentSummary {
                doc_id: doc_id.clone(),
                metadata_json: entry.metadata_json.clone(),
            })
            .collect())
    }
}

fn is_expired(entry: Option<&Entry>) -> bool {
    entry
        .and_then(|e| e.expires_at)
        .is_some_and(|at| Instant::now() >= at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryStore::new();
        store.put("doc-1", "[]", "{}", None).await.unwrap();
        let stored = store.get("doc-1").await.unwrap().unwrap();
        assert_eq!(stored.nodes_json, "[]");
    }

    #[tokio::test]
    async fn missing_document_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let store = MemoryStore::new();
        store.put("doc-1", "[]", "{}", None).await.unwrap();
        assert!(store.delete("doc-1").await.unwrap());
        assert!(!store.exists("doc-1").await.unwrap());
    }

    #[tokio::test]
    async fn delete_of_missing_document_returns_false() {
        let store = MemoryStore::new();
        assert!(!store.delete("missing").await.unwrap());
    }

    #[tokio::test]
    async fn list_returns_every_document() {
        let store = MemoryStore::new();
        store.put("doc-1", "[]", "{}", None).await.unwrap();
        store.put("doc-2", "[]", "{}", None).await.unwrap();
        let documents = store.list().await.unwrap();
        assert_eq!(documents.len(), 2);
    }

    #[tokio::test]
    async fn expired_entry_behaves_as_missing() {
        let store = MemoryStore::new();
        store.put("doc-1", "[]", "{}", Some(0)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(store.get("doc-1").await.unwrap().is_none());
    }
}
