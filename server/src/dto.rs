//! Request bodies accepted by the HTTP API.

use serde::Deserialize;

fn default_top_k() -> usize {
    5
}

fn default_max_length() -> usize {
    200
}

/// `POST /documents` — index a PDF already present in the upload directory.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    /// Identifier to store the resulting snapshot under.
    pub doc_id: String,
    /// File name, relative to the server's configured upload directory.
    pub file_name: String,
    /// Chunking preset name (`general`, `table`, `clause`, `report`, `advanced_query`).
    #[serde(default)]
    pub analysis_type: Option<String>,
}

/// `POST /documents/{doc_id}/query` — ask a free-form question.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// The question to answer.
    pub query: String,
    /// Whether to stream the answer as SSE chunks instead of one JSON response.
    #[serde(default)]
    pub streaming: bool,
    /// Number of child chunks to retrieve.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// `POST /documents/{doc_id}/summary`.
#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    /// Target summary length, in characters.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Number of child chunks to retrieve before summarizing.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// `POST /documents/{doc_id}/issues`.
#[derive(Debug, Deserialize)]
pub struct IssuesRequest {
    /// Number of child chunks to retrieve.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// `POST /documents/{doc_id}/clause`.
#[derive(Debug, Deserialize)]
pub struct ClauseRequest {
    /// The situation to find a governing clause for.
    pub situation: String,
    /// Number of child chunks to retrieve.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// `POST /documents/{doc_id}/reason`.
#[derive(Debug, Deserialize)]
pub struct ReasonRequest {
    /// The provision or condition to explain.
    pub provision: String,
    /// Number of child chunks to retrieve.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// `POST /documents/{doc_id}/exceptions`.
#[derive(Debug, Deserialize)]
pub struct ExceptionsRequest {
    /// The situation to find exception conditions for.
    pub situation: String,
    /// Number of child chunks to retrieve.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// `POST /documents/{doc_id}/advanced-query`.
#[derive(Debug, Deserialize)]
pub struct AdvancedQueryRequest {
    /// The (possibly compound) question to decompose and answer.
    pub query: String,
    /// Number of child chunks to retrieve per channel, per sub-question.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Whether to retrieve from the narrative body channel.
    #[serde(default = "default_true")]
    pub use_text: bool,
    /// Whether to retrieve from the table channel.
    #[serde(default = "default_true")]
    pub use_table: bool,
    /// Whether to retrieve from the structured/JSON-path channel.
    #[serde(default)]
    pub use_json: bool,
}

/// `POST /documents/{doc_id}/table-importance`, `/report-summary`, `/checklist`, `/faq`.
#[derive(Debug, Deserialize)]
pub struct TopKRequest {
    /// Number of child chunks to retrieve.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// `POST /documents/{doc_id}/table-criteria`.
#[derive(Debug, Deserialize)]
pub struct TableCriteriaRequest {
    /// The comparison criterion to evaluate the document's tables against.
    pub criteria: String,
    /// Number of child chunks to retrieve.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// `POST /documents/{doc_id}/ambiguous-text`.
#[derive(Debug, Deserialize)]
pub struct AmbiguousTextRequest {
    /// The text whose interpretation within the document is in question.
    pub text: String,
    /// Number of child chunks to retrieve.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// `POST /decompose-query`. Not scoped to a document: pure text decomposition.
#[derive(Debug, Deserialize)]
pub struct DecomposeRequest {
    /// The (possibly compound) question to decompose.
    pub query: String,
}

fn default_true() -> bool {
    true
}

/// `POST /documents/{doc_id}/multi-retrieval`.
#[derive(Debug, Deserialize)]
pub struct MultiRetrievalRequest {
    /// The query to retrieve against each enabled channel.
    pub query: String,
    /// Number of child chunks to retrieve per channel.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Whether to retrieve from the narrative body channel.
    #[serde(default = "default_true")]
    pub use_text: bool,
    /// Whether to retrieve from the table channel.
    #[serde(default = "default_true")]
    pub use_table: bool,
    /// Whether to retrieve from the structured/JSON-path channel.
    #[serde(default)]
    pub use_json: bool,
}
