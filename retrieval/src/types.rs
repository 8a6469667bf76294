//! Retrieval result types.

use serde::{Deserialize, Serialize};

/// One retrieved child chunk, with its parent's text for surrounding context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReference {
    /// Document this chunk was retrieved from.
    pub doc_id: String,
    /// The matched child node's own stable identifier.
    pub node_id: String,
    /// 1-based rank assigned in score-descending order, used in the citation marker.
    pub reference_number: usize,
    /// Ordinal of the enclosing parent node (its `chunk_index` among parents).
    pub parent_index: usize,
    /// Position of this child among its siblings.
    pub chunk_index: usize,
    /// The matched child chunk's text.
    pub text: String,
    /// The enclosing parent chunk's text, for surrounding context.
    pub parent_text: String,
    /// Cosine similarity against the query embedding, in `[-1.0, 1.0]`.
    pub score: f32,
}

impl SourceReference {
    /// The `"[참조 n: 문단 p-c]"` citation marker pointing at this child chunk.
    #[must_use]
    pub fn citation(&self) -> String {
        format!(
            "[참조 {}: 문단 {}-{}]",
            self.reference_number, self.parent_index, self.chunk_index
        )
    }

    /// The chunk's text truncated to at most 300 characters, for compact display.
    #[must_use]
    pub fn text_preview(&self) -> String {
        preview(&self.text)
    }
}

/// Truncates `text` to at most 300 characters on a char boundary.
fn preview(text: &str) -> String {
    const MAX_PREVIEW_CHARS: usize = 300;
    if text.chars().count() <= MAX_PREVIEW_CHARS {
        text.to_string()
    } else {
        text.chars().take(MAX_PREVIEW_CHARS).collect()
    }
}

/// A bundle of retrieved sources plus an aggregate confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Sources ordered by descending score, ties broken by ascending
    /// `(parent_index, chunk_index)`.
    pub sources: Vec<SourceReference>,
    /// Mean score of the returned sources, clamped to `[0.0, 1.0]` and
    /// rounded to four decimal places. `0.0` if no sources were returned.
    pub confidence: f64,
}

impl RetrievalResult {
    /// Builds a result from already score-sorted `sources`, assigning each a
    /// 1-based `reference_number` by position and computing the confidence score.
    #[must_use]
    pub fn new(mut sources: Vec<SourceReference>) -> Self {
        for (i, source) in sources.iter_mut().enumerate() {
            source.reference_number = i + 1;
        }
        let confidence = confidence_score(&sources);
        Self { sources, confidence }
    }
}

fn confidence_score(sources: &[SourceReference]) -> f64 {
    if sources.is_empty() {
        return 0.0;
    }
    let mean = sources.iter().map(|s| f64::from(s.score)).sum::<f64>() / sources.len() as f64;
    let clamped = mean.clamp(0.0, 1.0);
    (clamped * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(score: f32) -> SourceReference {
        SourceReference {
            doc_id: "doc-1".to_string(),
            node_id: "c0-0".to_string(),
            reference_number: 1,
            parent_index: 0,
            chunk_index: 0,
            text: "child".to_string(),
            parent_text: "parent".to_string(),
            score,
        }
    }

    #[test]
    fn citation_formats_reference_number_and_indices() {
        let src = SourceReference {
            doc_id: "doc-1".to_string(),
            node_id: "c2-1".to_string(),
            reference_number: 1,
            parent_index: 2,
            chunk_index: 1,
            text: String::new(),
            parent_text: String::new(),
            score: 0.0,
        };
        assert_eq!(src.citation(), "[참조 1: 문단 2-1]");
    }

    #[test]
    fn retrieval_result_assigns_reference_numbers_by_position() {
        let result = RetrievalResult::new(vec![source(0.9), source(0.8)]);
        assert_eq!(result.sources[0].reference_number, 1);
        assert_eq!(result.sources[1].reference_number, 2);
    }

    #[test]
    fn empty_sources_have_zero_confidence() {
        assert_eq!(RetrievalResult::new(vec![]).confidence, 0.0);
    }

    #[test]
    fn confidence_is_mean_rounded_to_four_decimals() {
        let result = RetrievalResult::new(vec![source(0.9), source(0.8)]);
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn confidence_clamps_above_one() {
        let result = RetrievalResult::new(vec![source(1.5)]);
        assert_eq!(result.confidence, 1.0);
    }
}
