//! Korean-language prompting, query planning, and answer envelopes for
//! retrieval-augmented question answering over policy documents.
//!
//! [`QaEngine`] is the main entry point: it retrieves context with
//! `policyrag-retrieval`, renders one of the Korean [`prompts`], and parses
//! the model's reply into an [`AnswerPayload`] or [`ItemListPayload`].
//! [`Envelope`] wraps any of those payloads (or an error) for a uniform API
//! response shape.

pub mod channel;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod parsing;
pub mod prompts;
pub mod types;

pub use channel::Channel;
pub use engine::QaEngine;
pub use envelope::Envelope;
pub use error::{QaError, Result};
pub use types::{
    AdvancedQueryPayload, AnswerPayload, ChecklistItem, ChecklistPayload, DecompositionPayload,
    ExceptionPayload, FaqEntry, FaqPayload, HighlightedSource, ItemListPayload,
    MultiRetrievalPayload,
};
