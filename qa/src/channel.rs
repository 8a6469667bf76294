//! Retrieval channels used by the advanced query plan.
//!
//! A document is retrieved along up to three independent channels — its
//! narrative body, its tables, and any structured (JSON-path-addressable)
//! data — and the results are fused by channel key rather than flattened,
//! so the fusion prompt can tell the model which channel each snippet came
//! from.

use std::collections::BTreeMap;

use policyrag_retrieval::SourceReference;

/// A retrieval channel for advanced multi-path queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    /// Narrative / prose body text.
    Body,
    /// Tabular content.
    Table,
    /// Structured, JSON-path-addressable data.
    JsonPath,
}

impl Channel {
    /// Korean label used when rendering this channel's section header.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Channel::Body => "본문",
            Channel::Table => "표",
            Channel::JsonPath => "구조화 데이터",
        }
    }
}

/// Fuses each enabled channel's rendered context into one labeled block,
/// keyed and ordered by [`Channel`]. Channels with no sources are omitted.
#[must_use]
pub fn fuse_channel_contexts(
    per_channel: &BTreeMap<Channel, Vec<SourceReference>>,
    render: impl Fn(&[SourceReference]) -> String,
) -> String {
    per_channel
        .iter()
        .filter(|(_, sources)| !sources.is_empty())
        .map(|(channel, sources)| format!("## {}\n\n{}", channel.label(), render(sources)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(text: &str) -> SourceReference {
        SourceReference {
            doc_id: "doc-1".to_string(),
            node_id: "c0-0".to_string(),
            reference_number: 1,
            parent_index: 0,
            chunk_index: 0,
            text: text.to_string(),
            parent_text: text.to_string(),
            score: 0.5,
        }
    }

    #[test]
    fn omits_channels_with_no_sources() {
        let mut per_channel = BTreeMap::new();
        per_channel.insert(Channel::Body, vec![source("body text")]);
        per_channel.insert(Channel::Table, vec![]);
        let fused = fuse_channel_contexts(&per_channel, |sources| {
            sources.iter().map(|s| s.text.clone()).collect::<Vec<_>>().join(" ")
        });
        assert!(fused.contains("본문"));
        assert!(!fused.contains("## 표"));
    }

    #[test]
    fn orders_channels_by_variant_order() {
        let mut per_channel = BTreeMap::new();
        per_channel.insert(Channel::Table, vec![source("table")]);
        per_channel.insert(Channel::Body, vec![source("body")]);
        let fused = fuse_channel_contexts(&per_channel, |sources| {
            sources.iter().map(|s| s.text.clone()).collect::<Vec<_>>().join(" ")
        });
        assert!(fused.find("본문").unwrap() < fused.find("표").unwrap());
    }
}
