//! Embedding-backed construction of a hierarchical node index.

use policyrag_core::EmbeddingModel;

use crate::config::ChunkConfig;
use crate::error::{IndexError, Result};
use crate::node::Node;
use crate::splitter::{split_hierarchical, PageSegment};

/// Children are embedded in batches of this size, issuing one request per
/// batch rather than one request per node.
const EMBED_BATCH_SIZE: usize = 16;

/// Splits a document into parent/child nodes and embeds every child.
pub struct IndexBuilder<'a, M: EmbeddingModel> {
    embedding_model: &'a M,
    config: ChunkConfig,
}

impl<'a, M: EmbeddingModel> IndexBuilder<'a, M> {
    /// Creates a builder using `embedding_model` and `config`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Validation`] if `config` fails validation.
    pub fn new(embedding_model: &'a M, config: ChunkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            embedding_model,
            config,
        })
    }

    /// Splits `pages` into parent/child nodes and embeds every child node.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Embedding`] if the embedding model fails for any batch.
    pub async fn build(&self, pages: &[PageSegment<'_>]) -> Result<Vec<Node>> {
        let mut nodes = split_hierarchical(pages, &self.config);
        self.embed_children(&mut nodes).await?;
        Ok(nodes)
    }

    async fn embed_children(&self, nodes: &mut [Node]) -> Result<()> {
        let child_indices: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_child())
            .map(|(i, _)| i)
            .collect();

        for batch in child_indices.chunks(EMBED_BATCH_SIZE) {
            for &idx in batch {
                let embedding = self
                    .embedding_model
                    .embed(&nodes[idx].text)
                    .await
                    .map_err(IndexError::Embedding)?;
                nodes[idx].embedding = Some(embedding);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockEmbeddingModel;

    impl EmbeddingModel for MockEmbeddingModel {
        async fn embed(&self, text: &str) -> policyrag_core::Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 0.0, 0.0])
        }

        fn dim(&self) -> usize {
            3
        }
    }

    #[tokio::test]
    async fn embeds_every_child_and_leaves_parents_bare() {
        let model = MockEmbeddingModel;
        let builder = IndexBuilder::new(&model, ChunkConfig::general()).unwrap();
        let pages = [PageSegment { page_label: 1, text: "A short sentence to index. Another one." }];
        let nodes = builder.build(&pages).await.unwrap();

        for node in &nodes {
            if node.is_child() {
                assert!(node.embedding.is_some());
            } else {
                assert!(node.embedding.is_none());
            }
        }
    }

    #[tokio::test]
    async fn rejects_invalid_config() {
        let model = MockEmbeddingModel;
        let config = ChunkConfig {
            parent_chunk_size: 10,
            ..ChunkConfig::general()
        };
        assert!(IndexBuilder::new(&model, config).is_err());
    }

    #[tokio::test]
    async fn batches_larger_than_embed_batch_size_still_embed_everything() {
        let model = MockEmbeddingModel;
        let builder = IndexBuilder::new(&model, ChunkConfig::general()).unwrap();
        let sentence = "A policy sentence long enough to force multiple children here. ";
        let text = sentence.repeat(60);
        let pages = [PageSegment { page_label: 1, text: text.as_str() }];
        let nodes = builder.build(&pages).await.unwrap();
        let child_count = nodes.iter().filter(|n| n.is_child()).count();
        assert!(child_count > EMBED_BATCH_SIZE);
        assert!(nodes.iter().filter(|n| n.is_child()).all(|n| n.embedding.is_some()));
    }
}
