//! Output payloads produced by [`crate::engine::QaEngine`] operations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use policyrag_retrieval::SourceReference;

/// A generated answer, the sources it drew on, and the citations it cited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerPayload {
    /// The model's free-text answer.
    pub answer: String,
    /// Sources retrieved to ground the answer.
    pub sources: Vec<SourceReference>,
    /// `"[참조 n: 문단 p-c]"` markers found inside `answer`.
    pub citations: Vec<String>,
    /// Retrieval confidence, propagated from [`policyrag_retrieval::RetrievalResult`].
    pub confidence: f64,
}

/// A list of extracted items (issues, checklist entries, FAQ entries),
/// alongside their sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemListPayload {
    /// Extracted items, one per bullet point the model produced.
    pub items: Vec<String>,
    /// Sources retrieved to ground the extraction.
    pub sources: Vec<SourceReference>,
    /// Retrieval confidence, propagated from [`policyrag_retrieval::RetrievalResult`].
    pub confidence: f64,
}

/// A source reference that matched at least one exception keyword, alongside
/// which keywords it matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightedSource {
    /// The underlying retrieved source.
    #[serde(flatten)]
    pub source: SourceReference,
    /// Every canonical exception keyword found as a substring of `source.text`.
    pub found_exception_keywords: Vec<String>,
}

/// Result of an exception-clause search: the model's answer plus only the
/// sources whose text actually carries an exception keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionPayload {
    /// The model's free-text answer.
    pub answer: String,
    /// Sources that matched at least one exception keyword, with the matches recorded.
    pub highlighted_sources: Vec<HighlightedSource>,
    /// `[참조 n: 문단 p-c]` markers found inside `answer`.
    pub citations: Vec<String>,
    /// Retrieval confidence, propagated from [`policyrag_retrieval::RetrievalResult`].
    pub confidence: f64,
}

/// One checklist entry, flagged `critical` when the model marked it as a
/// mandatory confirmation item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// The checklist entry's text.
    pub text: String,
    /// `true` when the model marked this item with `⚠️` or under a
    /// "필수 확인 사항" heading.
    pub critical: bool,
}

/// A generated compliance/procedure/review checklist, alongside its sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistPayload {
    /// Checklist entries in the order the model produced them.
    pub items: Vec<ChecklistItem>,
    /// Sources retrieved to ground the checklist.
    pub sources: Vec<SourceReference>,
    /// Retrieval confidence, propagated from [`policyrag_retrieval::RetrievalResult`].
    pub confidence: f64,
}

/// One FAQ question/answer pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    /// The synthesized question.
    pub question: String,
    /// The corresponding answer, grounded in the document.
    pub answer: String,
}

/// A generated list of frequently-asked questions, alongside its sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqPayload {
    /// Question/answer pairs in the order the model produced them.
    pub items: Vec<FaqEntry>,
    /// Sources retrieved to ground the FAQ.
    pub sources: Vec<SourceReference>,
    /// Retrieval confidence, propagated from [`policyrag_retrieval::RetrievalResult`].
    pub confidence: f64,
}

/// A complex question broken into independently-retrievable sub-questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecompositionPayload {
    /// The original, possibly compound, question.
    pub query: String,
    /// Independently-searchable sub-questions.
    pub sub_queries: Vec<String>,
}

/// Per-channel retrieval results, keyed by the Korean channel label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiRetrievalPayload {
    /// Sources retrieved on each enabled channel, keyed by channel label.
    pub channels: BTreeMap<String, Vec<SourceReference>>,
}

/// Result of the advanced query plan: decompose the question, answer each
/// sub-question independently with its own multi-channel retrieval and
/// fusion pass, then integrate the sub-answers into one final answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedQueryPayload {
    /// The decomposition step that produced the sub-queries below.
    pub decomposition: DecompositionPayload,
    /// One fully-grounded answer per sub-query, in the same order as
    /// `decomposition.sub_queries`.
    pub sub_query_results: Vec<AnswerPayload>,
    /// The model's integration of every sub-answer into one final answer.
    pub final_answer: String,
}
