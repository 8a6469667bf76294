//! Brute-force cosine-similarity retrieval over a stored document snapshot.

use policyrag_core::EmbeddingModel;
use policyrag_index::IndexSnapshot;
use policyrag_store::IndexStore;

use crate::error::{RetrievalError, Result};
use crate::types::{RetrievalResult, SourceReference};

/// Inclusive bounds `top_k` must fall within for every retrieval call.
pub const TOP_K_RANGE: std::ops::RangeInclusive<usize> = 1..=40;

/// Retrieves the `top_k` most relevant child chunks for a query.
pub struct Retriever<'a, E: EmbeddingModel, S: IndexStore> {
    embedding_model: &'a E,
    store: &'a S,
}

impl<'a, E: EmbeddingModel, S: IndexStore> Retriever<'a, E, S> {
    /// Creates a retriever over `store`, embedding queries with `embedding_model`.
    #[must_use]
    pub fn new(embedding_model: &'a E, store: &'a S) -> Self {
        Self {
            embedding_model,
            store,
        }
    }

    /// Loads `doc_id`'s snapshot, embeds `query`, and returns the `top_k`
    /// most similar child chunks with their enclosing parent text attached.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::InvalidTopK`] if `top_k` falls outside
    /// [`TOP_K_RANGE`], [`RetrievalError::NotFound`] if `doc_id` has no
    /// stored snapshot, [`RetrievalError::Store`] or [`RetrievalError::Index`]
    /// if loading or decoding it fails, or [`RetrievalError::Embedding`] if
    /// the query cannot be embedded.
    pub async fn search(&self, doc_id: &str, query: &str, top_k: usize) -> Result<RetrievalResult> {
        if !TOP_K_RANGE.contains(&top_k) {
            return Err(RetrievalError::InvalidTopK(top_k));
        }
        let stored = self
            .store
            .get(doc_id)
            .await?
            .ok_or_else(|| RetrievalError::NotFound(doc_id.to_string()))?;
        let snapshot = IndexSnapshot::decode(&stored.nodes_json)?;

        let query_embedding = self
            .embedding_model
            .embed(query)
            .await
            .map_err(RetrievalError::Embedding)?;

        let sources = top_k_children(&snapshot, doc_id, &query_embedding, top_k);
        Ok(RetrievalResult::new(sources))
    }
}

fn top_k_children(
    snapshot: &IndexSnapshot,
    doc_id: &str,
    query_embedding: &[f32],
    top_k: usize,
) -> Vec<SourceReference> {
    // `Node::parent_index` names a parent by its ordinal among parents, not
    // its flat position in `snapshot.nodes`, so parent text must be looked up
    // by that ordinal rather than indexed directly.
    let parent_text_by_ordinal: std::collections::HashMap<usize, &str> = snapshot
        .nodes
        .iter()
        .filter(|n| n.parent_index.is_none())
        .map(|n| (n.chunk_index, n.text.as_str()))
        .collect();

    let mut scored: Vec<SourceReference> = snapshot
        .nodes
        .iter()
        .filter(|node| node.is_child())
        .filter_map(|node| {
            let embedding = node.embedding.as_ref()?;
            let parent_index = node.parent_index?;
            let parent_text = (*parent_text_by_ordinal.get(&parent_index)?).to_string();
            Some(SourceReference {
                doc_id: doc_id.to_string(),
                node_id: node.id.clone(),
                reference_number: 0,
                parent_index,
                chunk_index: node.chunk_index,
                text: node.text.clone(),
                parent_text,
                score: cosine_similarity(query_embedding, embedding),
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.parent_index.cmp(&b.parent_index))
            .then_with(|| a.chunk_index.cmp(&b.chunk_index))
    });
    scored.truncate(top_k);
    scored
}

/// Cosine similarity between two equal-length vectors. Returns `0.0` if
/// either vector has zero magnitude or the lengths differ.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use policyrag_index::Node;
    use policyrag_store::MemoryStore;

    struct MockEmbeddingModel;

    impl EmbeddingModel for MockEmbeddingModel {
        async fn embed(&self, text: &str) -> policyrag_core::Result<Vec<f32>> {
            if text == "fail" {
                anyhow::bail!("embedding failed");
            }
            Ok(vec![1.0, 0.0])
        }

        fn dim(&self) -> usize {
            2
        }
    }

    fn snapshot_with(children: &[(usize, usize, Vec<f32>)]) -> IndexSnapshot {
        let mut nodes = vec![Node::parent("parent 0".to_string(), 0)];
        for &(parent_index, chunk_index, ref embedding) in children {
            let mut child = Node::child(format!("child {chunk_index}"), parent_index, chunk_index);
            child.embedding = Some(embedding.clone());
            nodes.push(child);
        }
        IndexSnapshot::new("doc-1", 2, nodes)
    }

    #[test]
    fn identical_vectors_have_similarity_one() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn orthogonal_vectors_have_similarity_zero() {
        assert!((cosine_similarity(&[1.0, 0.0], &[0.0, 1.0])).abs() < f32::EPSILON);
    }

    #[test]
    fn mismatched_lengths_are_zero() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn search_returns_top_k_ranked_by_score() {
        let snapshot = snapshot_with(&[(0, 0, vec![1.0, 0.0]), (0, 1, vec![0.0, 1.0])]);
        let store = MemoryStore::new();
        store
            .put("doc-1", &snapshot.encode().unwrap(), "{}", None)
            .await
            .unwrap();

        let model = MockEmbeddingModel;
        let retriever = Retriever::new(&model, &store);
        let result = retriever.search("doc-1", "query", 1).await.unwrap();

        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].chunk_index, 0);
        assert_eq!(result.sources[0].parent_text, "parent 0");
    }

    #[tokio::test]
    async fn top_k_out_of_range_is_rejected() {
        let store = MemoryStore::new();
        let model = MockEmbeddingModel;
        let retriever = Retriever::new(&model, &store);
        let err = retriever.search("doc-1", "query", 0).await.unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidTopK(0)));
        let err = retriever.search("doc-1", "query", 41).await.unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidTopK(41)));
    }

    #[tokio::test]
    async fn missing_document_is_not_found() {
        let store = MemoryStore::new();
        let model = MockEmbeddingModel;
        let retriever = Retriever::new(&model, &store);
        let err = retriever.search("missing", "query", 3).await.unwrap_err();
        assert!(matches!(err, RetrievalError::NotFound(_)));
    }

    #[tokio::test]
    async fn embedding_failure_is_propagated() {
        let snapshot = snapshot_with(&[(0, 0, vec![1.0, 0.0])]);
        let store = MemoryStore::new();
        store
            .put("doc-1", &snapshot.encode().unwrap(), "{}", None)
            .await
            .unwrap();
        let model = MockEmbeddingModel;
        let retriever = Retriever::new(&model, &store);
        let err = retriever.search("doc-1", "fail", 3).await.unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(_)));
    }

    #[tokio::test]
    async fn ties_break_by_ascending_parent_then_chunk_index() {
        let snapshot = snapshot_with(&[(0, 1, vec![1.0, 0.0]), (0, 0, vec![1.0, 0.0])]);
        let store = MemoryStore::new();
        store
            .put("doc-1", &snapshot.encode().unwrap(), "{}", None)
            .await
            .unwrap();
        let model = MockEmbeddingModel;
        let retriever = Retriever::new(&model, &store);
        let result = retriever.search("doc-1", "query", 2).await.unwrap();
        assert_eq!(result.sources[0].chunk_index, 0);
        assert_eq!(result.sources[1].chunk_index, 1);
    }
}
