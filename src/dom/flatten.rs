//! Flattened text index
//!
//! One depth-first pass over a subtree yields the concatenated text, the
//! ordered list of text node segments and the flattened offset at which
//! every visited node's subtree starts and ends. All offsets exposed here
//! are character offsets; byte offsets are kept internally so string
//! searches can run on the `str` directly.

use std::collections::HashMap;

use super::document::Document;
use super::types::{BoundaryPoint, NodeId, NodeKind};

/// Location of one text node inside the flattened string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub node: NodeId,
    pub byte_start: usize,
    pub char_start: usize,
    pub char_len: usize,
}

impl Segment {
    pub fn char_end(&self) -> usize {
        self.char_start + self.char_len
    }
}

/// Flattened text of a subtree plus the index mapping it back to nodes
#[derive(Debug, Clone)]
pub struct FlatText {
    root: NodeId,
    text: String,
    char_len: usize,
    segments: Vec<Segment>,
    /// Char offsets at which each node's subtree starts and ends
    spans: HashMap<NodeId, (usize, usize)>,
}

enum Visit {
    Enter(NodeId),
    Exit(NodeId),
}

impl FlatText {
    /// Flatten the subtree rooted at `root`
    pub fn build(doc: &Document, root: NodeId) -> Self {
        let mut text = String::new();
        let mut char_len = 0;
        let mut segments = Vec::new();
        let mut spans = HashMap::new();
        let mut stack = vec![Visit::Enter(root)];

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(node) => {
                    spans.insert(node, (char_len, char_len));
                    if let NodeKind::Text(content) = doc.kind(node) {
                        let len = content.chars().count();
                        segments.push(Segment {
                            node,
                            byte_start: text.len(),
                            char_start: char_len,
                            char_len: len,
                        });
                        text.push_str(content);
                        char_len += len;
                    }
                    stack.push(Visit::Exit(node));
                    stack.extend(doc.children(node).iter().rev().map(|&c| Visit::Enter(c)));
                }
                Visit::Exit(node) => {
                    if let Some(span) = spans.get_mut(&node) {
                        span.1 = char_len;
                    }
                }
            }
        }

        Self {
            root,
            text,
            char_len,
            segments,
            spans,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the node was part of the flattened subtree
    pub fn covers(&self, node: NodeId) -> bool {
        self.spans.contains_key(&node)
    }

    /// Flattened char offsets where the node's subtree starts and ends
    pub fn span_of(&self, node: NodeId) -> Option<(usize, usize)> {
        self.spans.get(&node).copied()
    }

    /// Flattened char offset of a boundary point
    ///
    /// Returns `None` when the container lies outside the flattened subtree.
    pub fn offset_of(&self, doc: &Document, point: BoundaryPoint) -> Option<usize> {
        let (start, end) = self.span_of(point.node)?;
        if doc.is_text(point.node) {
            return Some(start + point.offset.min(end - start));
        }
        match doc.children(point.node).get(point.offset) {
            Some(&child) => self.span_of(child).map(|(s, _)| s),
            None => Some(end),
        }
    }

    /// Boundary for a range start at `offset`: the text node whose content
    /// contains the character at `offset`
    pub fn boundary_at_start(&self, offset: usize) -> Option<BoundaryPoint> {
        self.segments
            .iter()
            .find(|s| offset >= s.char_start && offset < s.char_end())
            .map(|s| BoundaryPoint::new(s.node, offset - s.char_start))
    }

    /// Boundary for a range end at `offset`: the text node whose content
    /// contains the character right before `offset`
    pub fn boundary_at_end(&self, offset: usize) -> Option<BoundaryPoint> {
        self.segments
            .iter()
            .find(|s| offset > s.char_start && offset <= s.char_end())
            .map(|s| BoundaryPoint::new(s.node, offset - s.char_start))
    }

    /// Convert a byte offset into the flattened string to a char offset
    pub fn byte_to_char(&self, byte: usize) -> usize {
        let index = self.segments.partition_point(|s| s.byte_start <= byte);
        match index.checked_sub(1).map(|i| &self.segments[i]) {
            Some(seg) => seg.char_start + self.text[seg.byte_start..byte].chars().count(),
            None => 0,
        }
    }

    /// Convert a char offset to a byte offset into the flattened string
    pub fn char_to_byte(&self, offset: usize) -> usize {
        if offset >= self.char_len {
            return self.text.len();
        }
        let index = self.segments.partition_point(|s| s.char_start <= offset);
        match index.checked_sub(1).map(|i| &self.segments[i]) {
            Some(seg) => {
                let within = offset - seg.char_start;
                seg.byte_start
                    + self.text[seg.byte_start..]
                        .char_indices()
                        .nth(within)
                        .map(|(i, _)| i)
                        .unwrap_or(self.text.len() - seg.byte_start)
            }
            None => 0,
        }
    }

    /// Text between two char offsets
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let start = self.char_to_byte(start);
        let end = self.char_to_byte(end).max(start);
        &self.text[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::parse("<body><p>The <em>quick</em> brown</p><p>fox</p></body>").unwrap()
    }

    #[test]
    fn test_flatten_concatenates_in_order() {
        let doc = sample();
        let flat = FlatText::build(&doc, doc.content_root());
        assert_eq!(flat.as_str(), "The quick brownfox");
        assert_eq!(flat.segments().len(), 4);
        assert_eq!(flat.segments()[1].char_start, 4);
    }

    #[test]
    fn test_spans_cover_subtrees() {
        let doc = sample();
        let flat = FlatText::build(&doc, doc.content_root());
        let first_p = doc.elements_by_tag_name("p")[0];
        assert_eq!(flat.span_of(first_p), Some((0, 15)));
        let em = doc.elements_by_tag_name("em")[0];
        assert_eq!(flat.span_of(em), Some((4, 9)));
    }

    #[test]
    fn test_offset_of_element_boundary() {
        let doc = sample();
        let flat = FlatText::build(&doc, doc.content_root());
        let first_p = doc.elements_by_tag_name("p")[0];
        assert_eq!(flat.offset_of(&doc, BoundaryPoint::new(first_p, 1)), Some(4));
        assert_eq!(flat.offset_of(&doc, BoundaryPoint::new(first_p, 3)), Some(15));
    }

    #[test]
    fn test_boundary_mapping_prefers_containing_node() {
        let doc = sample();
        let flat = FlatText::build(&doc, doc.content_root());
        let start = flat.boundary_at_start(4).unwrap();
        let end = flat.boundary_at_end(4).unwrap();
        assert_eq!(doc.text(start.node), Some("quick"));
        assert_eq!(start.offset, 0);
        assert_eq!(doc.text(end.node), Some("The "));
        assert_eq!(end.offset, 4);
        assert!(flat.boundary_at_start(flat.char_len()).is_none());
    }

    #[test]
    fn test_multibyte_offsets() {
        let doc = Document::parse("<body><p>caf\u{e9} <b>cr\u{e8}me</b></p></body>").unwrap();
        let flat = FlatText::build(&doc, doc.content_root());
        assert_eq!(flat.char_len(), 10);
        let byte = flat.as_str().find("cr").unwrap();
        assert_eq!(flat.byte_to_char(byte), 5);
        assert_eq!(flat.slice(5, 10), "cr\u{e8}me");
    }
}
