//! Top-k retrieval of relevant chunks from a stored document index.
//!
//! [`Retriever`] loads a document's snapshot through an
//! [`policyrag_store::IndexStore`], embeds the query with a
//! [`policyrag_core::EmbeddingModel`], and ranks child nodes by cosine
//! similarity, attaching each match's parent chunk for context.

mod error;
mod retriever;
mod types;

pub use error::{RetrievalError, Result};
pub use retriever::{cosine_similarity, Retriever};
pub use types::{RetrievalResult, SourceReference};
