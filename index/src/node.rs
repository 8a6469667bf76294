//! Hierarchical node types produced by the splitter and builder.

/// Which level of the parent/child hierarchy a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A coarse chunk used only to give a matched child surrounding context.
    Parent,
    /// A fine-grained chunk that carries the embedding used for retrieval.
    Child,
}

/// One chunk of a document, at either the parent or child level.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    /// Globally unique identifier within the document snapshot this node
    /// belongs to. Derived from the node's structural position
    /// (`p<chunk_index>` for parents, `c<parent_index>-<chunk_index>` for
    /// children), which stays stable across re-encoding since those ordinals
    /// are themselves unique invariants of the hierarchy.
    #[serde(rename = "id_")]
    pub id: String,
    /// Parent or child.
    pub kind: NodeKind,
    /// The chunk's text.
    pub text: String,
    /// Index of the enclosing parent node, `None` for parent nodes themselves.
    pub parent_index: Option<usize>,
    /// Position of this node among its siblings at the same level, starting at 0.
    pub chunk_index: usize,
    /// Printed or ordinal label of the source page this chunk's text begins
    /// on, if the document was split with page information available.
    pub page_label: Option<usize>,
    /// Embedding vector, present on child nodes once the builder has run.
    pub embedding: Option<Vec<f32>>,
    /// `xxh3` hash of `text`, used to detect identical chunks across re-indexing runs.
    pub content_hash: u64,
}

impl Node {
    /// Builds a parent node. Parent nodes are never embedded.
    #[must_use]
    pub fn parent(text: String, chunk_index: usize) -> Self {
        let content_hash = hash_text(&text);
        Self {
            id: format!("p{chunk_index}"),
            kind: NodeKind::Parent,
            text,
            parent_index: None,
            chunk_index,
            page_label: None,
            embedding: None,
            content_hash,
        }
    }

    /// Builds a child node belonging to `parent_index`, without an embedding yet.
    #[must_use]
    pub fn child(text: String, parent_index: usize, chunk_index: usize) -> Self {
        let content_hash = hash_text(&text);
        Self {
            id: format!("c{parent_index}-{chunk_index}"),
            kind: NodeKind::Child,
            text,
            parent_index: Some(parent_index),
            chunk_index,
            page_label: None,
            embedding: None,
            content_hash,
        }
    }

    /// Attaches the source page label this chunk begins on.
    #[must_use]
    pub fn with_page_label(mut self, page_label: usize) -> Self {
        self.page_label = Some(page_label);
        self
    }

    /// Attaches the source page label this chunk begins on, if known.
    #[must_use]
    pub fn with_page_label_opt(mut self, page_label: Option<usize>) -> Self {
        self.page_label = page_label;
        self
    }

    /// True if this is a [`NodeKind::Child`] node.
    #[must_use]
    pub fn is_child(&self) -> bool {
        matches!(self.kind, NodeKind::Child)
    }
}

/// Hashes `text` with `xxh3`, used for [`Node::content_hash`].
#[must_use]
pub fn hash_text(text: &str) -> u64 {
    xxhash_rust::xxh3::xxh3_64(text.as_bytes())
}
