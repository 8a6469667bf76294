//! Hierarchical document indexing for retrieval-augmented question answering.
//!
//! A document's text is split into coarse parent chunks and, within each
//! parent, fine-grained child chunks ([`splitter::split_hierarchical`]).
//! [`IndexBuilder`] embeds every child with a caller-supplied
//! [`policyrag_core::EmbeddingModel`], and the resulting node graph is
//! wrapped in a versioned [`IndexSnapshot`] for persistence.
//!
//! # Example
//!
//! ```rust,no_run
//! use policyrag_index::{ChunkConfig, IndexBuilder, IndexSnapshot, PageSegment};
//! use policyrag_core::EmbeddingModel;
//!
//! async fn example<E: EmbeddingModel>(embedder: E, text: &str) -> policyrag_index::Result<()> {
//!     let builder = IndexBuilder::new(&embedder, ChunkConfig::general())?;
//!     let pages = [PageSegment { page_label: 1, text }];
//!     let nodes = builder.build(&pages).await?;
//!     let snapshot = IndexSnapshot::new("doc-1", embedder.dim(), nodes);
//!     let _json = snapshot.encode()?;
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod codec;
pub mod config;
pub mod error;
pub mod node;
pub mod splitter;

pub use builder::IndexBuilder;
pub use codec::{IndexSnapshot, CURRENT_VERSION};
pub use config::ChunkConfig;
pub use error::{IndexError, Result};
pub use node::{Node, NodeKind};
pub use splitter::{split_hierarchical, PageSegment};
