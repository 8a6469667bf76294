//! Chunk size configuration for the hierarchical node builder.

use crate::error::{IndexError, Result};

const PARENT_SIZE_RANGE: std::ops::RangeInclusive<usize> = 256..=8192;
const CHILD_SIZE_RANGE: std::ops::RangeInclusive<usize> = 64..=2048;
const PARENT_OVERLAP_RANGE: std::ops::RangeInclusive<usize> = 0..=500;
const CHILD_OVERLAP_RANGE: std::ops::RangeInclusive<usize> = 0..=200;

/// Parent/child chunk sizing for the hierarchical splitter.
///
/// A document is first split into parent chunks, then each parent is split
/// again into smaller child chunks that carry the embeddings used for
/// retrieval. `child_chunk_size` must stay below `parent_chunk_size`, or no
/// parent would contain more than one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Maximum characters per parent chunk.
    pub parent_chunk_size: usize,
    /// Overlap, in characters, between consecutive parent chunks.
    pub parent_chunk_overlap: usize,
    /// Maximum characters per child chunk.
    pub child_chunk_size: usize,
    /// Overlap, in characters, between consecutive child chunks.
    pub child_chunk_overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self::general()
    }
}

impl ChunkConfig {
    /// Validates every field against its documented bounds.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Validation`] if any field is out of range, or if
    /// `child_chunk_size >= parent_chunk_size`.
    pub fn validate(&self) -> Result<()> {
        if !PARENT_SIZE_RANGE.contains(&self.parent_chunk_size) {
            return Err(IndexError::Validation(format!(
                "parent_chunk_size {} out of range {PARENT_SIZE_RANGE:?}",
                self.parent_chunk_size
            )));
        }
        if !CHILD_SIZE_RANGE.contains(&self.child_chunk_size) {
            return Err(IndexError::Validation(format!(
                "child_chunk_size {} out of range {CHILD_SIZE_RANGE:?}",
                self.child_chunk_size
            )));
        }
        if !PARENT_OVERLAP_RANGE.contains(&self.parent_chunk_overlap) {
            return Err(IndexError::Validation(format!(
                "parent_chunk_overlap {} out of range {PARENT_OVERLAP_RANGE:?}",
                self.parent_chunk_overlap
            )));
        }
        if !CHILD_OVERLAP_RANGE.contains(&self.child_chunk_overlap) {
            return Err(IndexError::Validation(format!(
                "child_chunk_overlap {} out of range {CHILD_OVERLAP_RANGE:?}",
                self.child_chunk_overlap
            )));
        }
        if self.child_chunk_size >= self.parent_chunk_size {
            return Err(IndexError::Validation(format!(
                "child_chunk_size {} must be smaller than parent_chunk_size {}",
                self.child_chunk_size, self.parent_chunk_size
            )));
        }
        Ok(())
    }

    /// The default preset used when an analysis type has no dedicated preset.
    #[must_use]
    pub const fn general() -> Self {
        Self {
            parent_chunk_size: 1024,
            parent_chunk_overlap: 100,
            child_chunk_size: 256,
            child_chunk_overlap: 50,
        }
    }

    /// Preset tuned for table-heavy documents: larger parents keep a whole
    /// table together while children stay small enough to pinpoint a row.
    #[must_use]
    pub const fn table() -> Self {
        Self {
            parent_chunk_size: 1536,
            parent_chunk_overlap: 150,
            child_chunk_size: 256,
            child_chunk_overlap: 50,
        }
    }

    /// Preset tuned for clause-level lookups: smaller children favor
    /// precision over recall when matching a single clause.
    #[must_use]
    pub const fn clause() -> Self {
        Self {
            parent_chunk_size: 1024,
            parent_chunk_overlap: 100,
            child_chunk_size: 128,
            child_chunk_overlap: 30,
        }
    }

    /// Preset tuned for report/checklist generation, which benefits from
    /// wider context windows on both levels.
    #[must_use]
    pub const fn report() -> Self {
        Self {
            parent_chunk_size: 2048,
            parent_chunk_overlap: 100,
            child_chunk_size: 512,
            child_chunk_overlap: 50,
        }
    }

    /// Preset tuned for query decomposition and multi-channel retrieval,
    /// which re-queries several times and benefits from broader children.
    #[must_use]
    pub const fn advanced_query() -> Self {
        Self {
            parent_chunk_size: 2048,
            parent_chunk_overlap: 100,
            child_chunk_size: 512,
            child_chunk_overlap: 50,
        }
    }

    /// Looks up the named preset for an analysis type, falling back to
    /// [`ChunkConfig::general`] for anything unrecognized.
    #[must_use]
    pub fn for_analysis_type(analysis_type: &str) -> Self {
        match analysis_type {
            "table" => Self::table(),
            "clause" => Self::clause(),
            "report" => Self::report(),
            "advanced_query" => Self::advanced_query(),
            _ => Self::general(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_preset_is_valid() {
        ChunkConfig::general().validate().unwrap();
    }

    #[test]
    fn unknown_analysis_type_falls_back_to_general() {
        assert_eq!(
            ChunkConfig::for_analysis_type("unknown"),
            ChunkConfig::general()
        );
    }

    #[test]
    fn named_presets_are_all_valid() {
        for preset in [
            ChunkConfig::table(),
            ChunkConfig::clause(),
            ChunkConfig::report(),
            ChunkConfig::advanced_query(),
        ] {
            preset.validate().unwrap();
        }
    }

    #[test]
    fn child_must_be_smaller_than_parent() {
        let config = ChunkConfig {
            parent_chunk_size: 300,
            parent_chunk_overlap: 0,
            child_chunk_size: 300,
            child_chunk_overlap: 0,
        };
        assert!(matches!(config.validate(), Err(IndexError::Validation(_))));
    }

    #[test]
    fn out_of_range_parent_size_rejected() {
        let config = ChunkConfig {
            parent_chunk_size: 100,
            ..ChunkConfig::general()
        };
        assert!(config.validate().is_err());
    }
}
