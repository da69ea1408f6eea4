//! Arena-backed document tree
//!
//! The anchoring engine reads documents only through this type, so tests
//! can build trees by hand and hosts can feed parsed markup.

use std::path::Path;

use super::range::TextRange;
use super::types::{Node, NodeId, NodeKind};
use crate::error::{AnchorError, Result};

/// A document tree
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create an empty document containing only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document)],
        }
    }

    /// Parse well-formed (X)HTML or XML markup
    ///
    /// Comments, processing instructions and the doctype are dropped.
    /// Whitespace-only text nodes are kept.
    pub fn parse(markup: &str) -> Result<Self> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let parsed = roxmltree::Document::parse_with_options(markup, options)
            .map_err(|e| AnchorError::Parse(e.to_string()))?;

        let mut doc = Self::new();
        let root = doc.root();
        let mut stack: Vec<(roxmltree::Node, NodeId)> =
            parsed.root().children().rev().map(|c| (c, root)).collect();

        while let Some((source, parent)) = stack.pop() {
            let id = if source.is_element() {
                let el = doc.create_element(source.tag_name().name());
                for attr in source.attributes() {
                    doc.set_attribute(el, attr.name(), attr.value())?;
                }
                el
            } else if source.is_text() {
                doc.create_text(source.text().unwrap_or_default())
            } else {
                continue;
            };
            doc.append_child(parent, id)?;
            stack.extend(source.children().rev().map(|c| (c, id)));
        }

        Ok(doc)
    }

    /// Read and parse a markup file
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self> {
        let markup = std::fs::read_to_string(path)?;
        Self::parse(&markup)
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
        })
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Node::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_insertion(parent, child)?;
        self.detach(child)?;
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// Insert `child` into `parent` right before `reference`
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<()> {
        self.check_insertion(parent, child)?;
        if child == reference {
            return Ok(());
        }
        if self.parent(reference) != Some(parent) {
            return Err(AnchorError::InvalidTree(format!(
                "{} is not a child of {}",
                reference, parent
            )));
        }
        self.detach(child)?;
        let position = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == reference)
            .ok_or_else(|| AnchorError::InvalidTree(format!("{} vanished", reference)))?;
        self.nodes[parent.0].children.insert(position, child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check(parent)?;
        self.check(child)?;
        if self.is_text(parent) {
            return Err(AnchorError::InvalidTree(format!(
                "text node {} cannot have children",
                parent
            )));
        }
        if matches!(self.kind(child), NodeKind::Document) {
            return Err(AnchorError::InvalidTree(
                "the document node cannot be inserted".to_string(),
            ));
        }
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(AnchorError::InvalidTree(format!(
                    "inserting {} into {} would create a cycle",
                    child, parent
                )));
            }
            cursor = self.parent(node);
        }
        Ok(())
    }

    fn check(&self, node: NodeId) -> Result<()> {
        if node.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(AnchorError::InvalidTree(format!("unknown node {}", node)))
        }
    }

    /// Remove a node (and its subtree) from its parent
    ///
    /// The node stays in the arena and can be re-inserted.
    pub fn detach(&mut self, node: NodeId) -> Result<()> {
        self.check(node)?;
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
        Ok(())
    }

    /// Replace the content of a text node
    pub fn set_text(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.check(node)?;
        match &mut self.nodes[node.0].kind {
            NodeKind::Text(content) => {
                *content = text.to_string();
                Ok(())
            }
            _ => Err(AnchorError::InvalidTree(format!("{} is not a text node", node))),
        }
    }

    /// Set (or replace) an attribute on an element
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.check(node)?;
        match &mut self.nodes[node.0].kind {
            NodeKind::Element { attributes, .. } => {
                match attributes.iter_mut().find(|(n, _)| n == name) {
                    Some((_, existing)) => *existing = value.to_string(),
                    None => attributes.push((name.to_string(), value.to_string())),
                }
                Ok(())
            }
            _ => Err(AnchorError::InvalidTree(format!("{} is not an element", node))),
        }
    }

    // ============================================
    // Queries
    // ============================================

    /// Whether the id refers to a node of this document
    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Element children in order
    pub fn element_children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(node)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.kind(node), NodeKind::Element { .. })
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.kind(node), NodeKind::Text(_))
    }

    /// Lowercased tag name of an element
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        match self.kind(node) {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match self.kind(node) {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Content of a text node
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.kind(node) {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Character length of a text node, child count of anything else
    pub fn boundary_len(&self, node: NodeId) -> usize {
        match self.kind(node) {
            NodeKind::Text(text) => text.chars().count(),
            _ => self.children(node).len(),
        }
    }

    /// Whether the node is reachable from the document node
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut cursor = node;
        loop {
            if cursor == self.root() {
                return true;
            }
            match self.parent(cursor) {
                Some(parent) => cursor = parent,
                None => return false,
            }
        }
    }

    /// Pre-order traversal starting at (and including) `node`
    pub fn descendants(&self, node: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: vec![node],
        }
    }

    /// Text nodes under `node` in document order
    pub fn text_nodes(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(node).filter(|&n| self.is_text(n))
    }

    /// Depth-first concatenation of all text under `node`
    pub fn text_content(&self, node: NodeId) -> String {
        self.text_nodes(node)
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// All elements with the given tag in document order (`*` matches any)
    pub fn elements_by_tag_name(&self, tag: &str) -> Vec<NodeId> {
        let wanted = tag.to_ascii_lowercase();
        self.descendants(self.root())
            .filter(|&n| match self.tag_name(n) {
                Some(name) => wanted == "*" || name == wanted,
                None => false,
            })
            .collect()
    }

    /// All attached elements carrying the given id attribute
    pub fn elements_with_id(&self, id: &str) -> Vec<NodeId> {
        self.descendants(self.root())
            .filter(|&n| self.attribute(n, "id") == Some(id))
            .collect()
    }

    /// First attached element with the given id
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .find(|&n| self.attribute(n, "id") == Some(id))
    }

    /// The first `body` element
    pub fn body(&self) -> Option<NodeId> {
        self.descendants(self.root())
            .find(|&n| self.tag_name(n) == Some("body"))
    }

    /// Subtree whose text is searched and used for context: the body when
    /// present, otherwise the whole document
    pub fn content_root(&self) -> NodeId {
        self.body().unwrap_or_else(|| self.root())
    }

    /// Range over the content-root text between two char offsets
    pub fn range_from_offsets(&self, start: usize, end: usize) -> Result<TextRange> {
        TextRange::from_offsets(self, start, end)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(node).iter().rev().copied());
        Some(node)
    }
}
