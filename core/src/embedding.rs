//! # Embedding Module
//!
//! Types and traits for converting text into dense vector representations.
//! Similar texts produce similar vectors, which is what makes cosine-similarity
//! retrieval over a set of document chunks work at all.
//!
//! ```rust
//! use policyrag_core::EmbeddingModel;
//!
//! async fn example<T: EmbeddingModel>(model: &T) -> policyrag_core::Result<()> {
//!     let dim = model.dim();
//!     let embedding = model.embed("Hello, world!").await?;
//!     assert_eq!(embedding.len(), dim);
//!     Ok(())
//! }
//! ```

use std::future::Future;

/// An embedding vector of 32-bit floats.
pub type Embedding = Vec<f32>;

/// Converts text to vector representations.
///
/// Implementations typically call out to a hosted embedding API
/// (`policyrag-providers`), but a fixed-dimension deterministic mock is
/// useful for tests that must not touch the network.
///
/// # Implementation Requirements
///
/// - [`embed`](EmbeddingModel::embed) must return a vector of length [`dim`](EmbeddingModel::dim).
/// - Errors (network failures, rate limits) should be surfaced through the
///   returned `Result`, never by panicking.
pub trait EmbeddingModel: Send + Sync {
    /// Returns the embedding vector dimension.
    fn dim(&self) -> usize;

    /// Converts text to an embedding vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedding call fails (network, quota, or
    /// provider-side rejection of the input).
    fn embed(&self, text: &str) -> impl Future<Output = crate::Result<Vec<f32>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A deterministic stand-in for a hosted embedding API: hashes the clause
    /// text with `xxh3` and spreads the bits across the requested dimension,
    /// so two retrieval-test fixtures with different wording never collide
    /// but the same clause always embeds identically across calls.
    struct ClauseHashEmbeddingModel {
        dimension: usize,
    }

    impl EmbeddingModel for ClauseHashEmbeddingModel {
        fn dim(&self) -> usize {
            self.dimension
        }

        #[allow(clippy::cast_precision_loss)]
        async fn embed(&self, text: &str) -> crate::Result<Vec<f32>> {
            let hash = xxhash_rust::xxh3::xxh3_64(text.as_bytes());
            let mut embedding = vec![0.0; self.dimension];
            for (i, value) in embedding.iter_mut().enumerate() {
                let byte = (hash >> ((i % 8) * 8)) & 0xff;
                *value = (byte as f32 + i as f32) * 0.01;
            }
            Ok(embedding)
        }
    }

    #[tokio::test]
    async fn dimension_matches_configured_size() {
        let model = ClauseHashEmbeddingModel { dimension: 768 };
        assert_eq!(model.dim(), 768);
    }

    #[tokio::test]
    async fn embedding_length_matches_dimension() {
        let model = ClauseHashEmbeddingModel { dimension: 4 };
        let embedding = model.embed("제3조 적용 범위").await.unwrap();
        assert_eq!(embedding.len(), 4);
    }

    #[tokio::test]
    async fn identical_clause_text_embeds_identically() {
        let model = ClauseHashEmbeddingModel { dimension: 8 };
        let a = model.embed("다만, 허위 신고의 경우 제외한다.").await.unwrap();
        let b = model.embed("다만, 허위 신고의 경우 제외한다.").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn different_clause_text_embeds_differently() {
        let model = ClauseHashEmbeddingModel { dimension: 8 };
        let a = model.embed("신청 기한은 30일입니다.").await.unwrap();
        let b = model.embed("수수료는 없습니다.").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn empty_text_still_returns_full_dimension() {
        let model = ClauseHashEmbeddingModel { dimension: 16 };
        let embedding = model.embed("").await.unwrap();
        assert_eq!(embedding.len(), 16);
    }
}
