//! Node types for the document arena

use std::fmt;

/// Handle to a node inside a [`Document`](super::Document) arena
///
/// Ids stay valid for the lifetime of the document, including after the
/// node has been detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena index
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node (arena root)
    Document,
    /// Element with a lowercased tag name
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    /// Text node
    Text(String),
}

/// A node in the arena
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            kind,
        }
    }
}

/// One end of a range: a container node and an offset into it
///
/// For text nodes the offset counts characters, for elements it counts
/// child nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryPoint {
    pub node: NodeId,
    pub offset: usize,
}

impl BoundaryPoint {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// Portion of a single text node covered by a range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSegment {
    pub node: NodeId,
    /// Start char offset within the node
    pub start: usize,
    /// End char offset within the node (exclusive)
    pub end: usize,
}
