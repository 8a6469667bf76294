//! Versioned JSON snapshot format for a built index.
//!
//! Snapshots are what gets persisted to the external store. `encode` and
//! `decode` are the only supported way to cross that boundary, so every
//! snapshot that makes it back out of the store is guaranteed to satisfy
//! [`IndexSnapshot::validate`].

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::node::Node;

/// Highest snapshot version this build can decode.
pub const CURRENT_VERSION: u32 = 1;

/// A persisted, versioned set of nodes for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSnapshot {
    /// Snapshot format version.
    pub version: u32,
    /// Identifier of the document this snapshot was built from.
    pub doc_id: String,
    /// Dimensionality every child node's embedding must share.
    pub embedding_dim: usize,
    /// Parent and child nodes, parents first within each hierarchy level.
    pub nodes: Vec<Node>,
}

impl IndexSnapshot {
    /// Wraps `nodes` for `doc_id` into a snapshot at [`CURRENT_VERSION`].
    #[must_use]
    pub fn new(doc_id: impl Into<String>, embedding_dim: usize, nodes: Vec<Node>) -> Self {
        Self {
            version: CURRENT_VERSION,
            doc_id: doc_id.into(),
            embedding_dim,
            nodes,
        }
    }

    /// Serializes the snapshot to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Serialization`] if serialization fails.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(IndexError::Serialization)
    }

    /// Parses and validates a JSON string produced by [`IndexSnapshot::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::CorruptIndex`] if the JSON does not parse,
    /// [`IndexError::VersionTooNew`] if its version is newer than this build
    /// supports, or [`IndexError::CorruptIndex`] if the node graph is internally
    /// inconsistent.
    pub fn decode(raw: &str) -> Result<Self> {
        let snapshot: Self =
            serde_json::from_str(raw).map_err(|e| IndexError::CorruptIndex(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Checks internal consistency: version support, parent references that
    /// resolve, child chunk indices that are contiguous per parent, and
    /// embeddings that all share `embedding_dim`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::VersionTooNew`] or [`IndexError::CorruptIndex`].
    pub fn validate(&self) -> Result<()> {
        if self.version > CURRENT_VERSION {
            return Err(IndexError::VersionTooNew {
                found: self.version,
                supported: CURRENT_VERSION,
            });
        }

        // `Node::parent_index` names a parent by its *ordinal* (`chunk_index`
        // among other parents), not its flat position in `self.nodes`, so
        // parents must be looked up by that ordinal rather than indexed directly.
        let parent_by_ordinal: std::collections::HashMap<usize, usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent_index.is_none())
            .map(|(i, n)| (n.chunk_index, i))
            .collect();

        let mut expected_child_index: std::collections::HashMap<usize, usize> =
            std::collections::HashMap::new();

        for (idx, node) in self.nodes.iter().enumerate() {
            match node.parent_index {
                None => continue,
                Some(parent_ordinal) => {
                    let Some(&parent_idx) = parent_by_ordinal.get(&parent_ordinal) else {
                        return Err(IndexError::CorruptIndex(format!(
                            "node {idx} references unknown parent ordinal {parent_ordinal}"
                        )));
                    };
                    if parent_idx == idx {
                        return Err(IndexError::CorruptIndex(format!(
                            "node {idx} references out-of-range parent {parent_idx}"
                        )));
                    }

                    let next = expected_child_index.entry(parent_ordinal).or_insert(0);
                    if node.chunk_index != *next {
                        return Err(IndexError::CorruptIndex(format!(
                            "node {idx} has out-of-sequence chunk_index {} under parent {parent_idx}, expected {next}",
                            node.chunk_index
                        )));
                    }
                    *next += 1;

                    let Some(embedding) = &node.embedding else {
                        return Err(IndexError::CorruptIndex(format!(
                            "child node {idx} is missing its embedding"
                        )));
                    };
                    if embedding.len() != self.embedding_dim {
                        return Err(IndexError::CorruptIndex(format!(
                            "child node {idx} embedding has dimension {}, expected {}",
                            embedding.len(),
                            self.embedding_dim
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
