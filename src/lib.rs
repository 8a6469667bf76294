//! # policyrag
//!
//! Facade crate re-exporting every crate in the `policyrag` workspace: PDF
//! text extraction, hierarchical indexing, snapshot persistence, top-k
//! retrieval, and retrieval-augmented question answering over policy and
//! regulatory documents. Pull this crate into a binary to assemble the whole
//! pipeline without depending on each workspace member directly.
//!
//! ## Modules
//!
//! - [`core`] — `EmbeddingModel`/`Generator` trait abstractions shared across the workspace.
//! - [`pdf`] — per-page PDF text extraction.
//! - [`index`] — hierarchical node splitting, embedding, and the versioned snapshot codec.
//! - [`store`] — the `IndexStore` trait plus Redis-backed and in-memory implementations.
//! - [`retrieval`] — cosine-similarity top-k retrieval over a stored snapshot.
//! - [`qa`] — Korean-language prompt templates, output parsing, and the question-answering engine.
//! - [`providers`] — an OpenAI-compatible `EmbeddingModel`/`Generator` implementation (feature `providers`).

pub use policyrag_core as core;
pub use policyrag_index as index;
pub use policyrag_pdf as pdf;
pub use policyrag_qa as qa;
pub use policyrag_retrieval as retrieval;
pub use policyrag_store as store;

#[cfg(feature = "providers")]
pub use policyrag_providers as providers;
