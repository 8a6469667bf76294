//! # policyrag-core
//!
//! Trait abstractions shared across the `policyrag` workspace: converting text to
//! vectors ([`EmbeddingModel`]) and turning prompts into answers
//! ([`Generator`]). Concrete providers (HTTP calls to an embedding/completion
//! API) live in `policyrag-providers`; this crate only describes the shape of
//! those calls so the rest of the workspace — indexing, retrieval, the query
//! planner, the HTTP server — can stay provider-agnostic.
//!
//! ## Modules
//!
//! - [`embedding`] — turn text into dense vectors.
//! - [`llm`] — prompt messages and the [`Generator`] completion/streaming trait.

pub mod embedding;
pub mod llm;

#[doc(inline)]
pub use embedding::EmbeddingModel;
#[doc(inline)]
pub use llm::{Generator, Message, Role};

/// Result type used throughout the crate.
///
/// Type alias for [`anyhow::Result<T>`](anyhow::Result) with [`String`] as default success type.
pub type Result<T = String> = anyhow::Result<T>;

pub use anyhow::Error;
