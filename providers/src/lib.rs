//! OpenAI-compatible embedding and completion provider.
//!
//! [`Provider`] implements [`policyrag_core::EmbeddingModel`] and
//! [`policyrag_core::llm::Generator`] over a plain `reqwest` HTTP client,
//! matching the `/embeddings` and `/chat/completions` surface shared by
//! OpenAI and most self-hosted compatible gateways. It is the default
//! implementation the server binary wires up; tests elsewhere in the
//! workspace use hand-written mocks instead.

mod client;
mod embedding;
mod error;
mod generator;

pub use client::Provider;
pub use error::ProviderError;
