//! Text ranges over a document
//!
//! A [`TextRange`] is plain data (two boundary points). It only has meaning
//! together with the [`Document`] it was built against, which every method
//! takes explicitly.

use std::cmp::Ordering;

use super::document::Document;
use super::flatten::FlatText;
use super::types::{BoundaryPoint, NodeId, NodeKind, TextSegment};
use crate::error::{AnchorError, Result};

/// A contiguous span of a document between two boundary points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    start: BoundaryPoint,
    end: BoundaryPoint,
}

impl TextRange {
    /// Build a range, validating both boundaries and their order
    pub fn new(doc: &Document, start: BoundaryPoint, end: BoundaryPoint) -> Result<Self> {
        let start_key = boundary_key(doc, start)?;
        let end_key = boundary_key(doc, end)?;
        if start_key.cmp(&end_key) == Ordering::Greater {
            return Err(AnchorError::InvalidBoundary(format!(
                "start {}:{} is after end {}:{}",
                start.node, start.offset, end.node, end.offset
            )));
        }
        Ok(Self { start, end })
    }

    /// Range covering the flattened content-root text between two char
    /// offsets
    pub fn from_offsets(doc: &Document, start: usize, end: usize) -> Result<Self> {
        let flat = FlatText::build(doc, doc.content_root());
        if start > end || end > flat.char_len() {
            return Err(AnchorError::InvalidBoundary(format!(
                "offsets {}..{} outside text of length {}",
                start,
                end,
                flat.char_len()
            )));
        }
        let start_point = if start == end {
            flat.boundary_at_end(end).or_else(|| flat.boundary_at_start(start))
        } else {
            flat.boundary_at_start(start)
        };
        let end_point = if start == end {
            start_point
        } else {
            flat.boundary_at_end(end)
        };
        match (start_point, end_point) {
            (Some(s), Some(e)) => Self::new(doc, s, e),
            _ => Err(AnchorError::InvalidBoundary(
                "document has no text to select".to_string(),
            )),
        }
    }

    pub fn start(&self) -> BoundaryPoint {
        self.start
    }

    pub fn end(&self) -> BoundaryPoint {
        self.end
    }

    /// Both boundaries are the same point
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Text covered by the range
    pub fn text(&self, doc: &Document) -> String {
        let flat = FlatText::build(doc, doc.root());
        match self.flat_offsets(doc, &flat) {
            Some((start, end)) => flat.slice(start, end).to_string(),
            None => String::new(),
        }
    }

    /// Flattened char offsets of the range within the content root
    pub fn offsets(&self, doc: &Document) -> Option<(usize, usize)> {
        let flat = FlatText::build(doc, doc.content_root());
        self.flat_offsets(doc, &flat)
    }

    fn flat_offsets(&self, doc: &Document, flat: &FlatText) -> Option<(usize, usize)> {
        let start = flat.offset_of(doc, self.start)?;
        let end = flat.offset_of(doc, self.end)?;
        Some((start, end.max(start)))
    }

    /// Split the range into per-text-node pieces, skipping empty ones
    pub fn segments(&self, doc: &Document) -> Vec<TextSegment> {
        let flat = FlatText::build(doc, doc.root());
        let Some((start, end)) = self.flat_offsets(doc, &flat) else {
            return Vec::new();
        };
        flat.segments()
            .iter()
            .filter_map(|seg| {
                let from = start.max(seg.char_start);
                let to = end.min(seg.char_end());
                (from < to).then(|| TextSegment {
                    node: seg.node,
                    start: from - seg.char_start,
                    end: to - seg.char_start,
                })
            })
            .collect()
    }
}

/// Sort key for a boundary point in tree order
///
/// The key is the child-index path from the document node to the
/// container followed by the offset, so lexicographic order on keys is
/// document order on points.
fn boundary_key(doc: &Document, point: BoundaryPoint) -> Result<Vec<usize>> {
    if !doc.contains(point.node) {
        return Err(AnchorError::InvalidBoundary(format!(
            "unknown node {}",
            point.node
        )));
    }
    if matches!(doc.kind(point.node), NodeKind::Document) {
        return Err(AnchorError::InvalidBoundary(
            "boundary container must be an element or text node".to_string(),
        ));
    }
    let len = doc.boundary_len(point.node);
    if point.offset > len {
        return Err(AnchorError::InvalidBoundary(format!(
            "offset {} exceeds length {} of {}",
            point.offset, len, point.node
        )));
    }

    let mut key = vec![point.offset];
    let mut cursor: NodeId = point.node;
    while let Some(parent) = doc.parent(cursor) {
        let index = doc
            .children(parent)
            .iter()
            .position(|&c| c == cursor)
            .unwrap_or_default();
        key.push(index);
        cursor = parent;
    }
    if cursor != doc.root() {
        return Err(AnchorError::InvalidBoundary(format!(
            "{} is detached from the document",
            point.node
        )));
    }
    key.reverse();
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::parse("<body><p>The <em>quick</em> brown</p><p>fox</p></body>").unwrap()
    }

    #[test]
    fn test_text_across_nodes() {
        let doc = sample();
        let range = TextRange::from_offsets(&doc, 2, 12).unwrap();
        assert_eq!(range.text(&doc), "e quick br");
        assert_eq!(range.offsets(&doc), Some((2, 12)));
    }

    #[test]
    fn test_element_boundaries() {
        let doc = sample();
        let p = doc.elements_by_tag_name("p")[0];
        let range =
            TextRange::new(&doc, BoundaryPoint::new(p, 1), BoundaryPoint::new(p, 2)).unwrap();
        assert_eq!(range.text(&doc), "quick");
    }

    #[test]
    fn test_rejects_reversed_range() {
        let doc = sample();
        let p = doc.elements_by_tag_name("p")[0];
        let result = TextRange::new(&doc, BoundaryPoint::new(p, 2), BoundaryPoint::new(p, 1));
        assert!(matches!(result, Err(AnchorError::InvalidBoundary(_))));
    }

    #[test]
    fn test_rejects_offset_past_end() {
        let doc = sample();
        let em_text = doc.text_nodes(doc.elements_by_tag_name("em")[0]).next().unwrap();
        let result = TextRange::new(
            &doc,
            BoundaryPoint::new(em_text, 0),
            BoundaryPoint::new(em_text, 6),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_detached_container() {
        let mut doc = sample();
        let em = doc.elements_by_tag_name("em")[0];
        doc.detach(em).unwrap();
        let result = TextRange::new(&doc, BoundaryPoint::new(em, 0), BoundaryPoint::new(em, 1));
        assert!(result.is_err());
    }

    #[test]
    fn test_text_point_inside_child_orders_after_parent_point() {
        let doc = sample();
        let p = doc.elements_by_tag_name("p")[0];
        let first_text = doc.children(p)[0];
        let range = TextRange::new(
            &doc,
            BoundaryPoint::new(p, 0),
            BoundaryPoint::new(first_text, 2),
        )
        .unwrap();
        assert_eq!(range.text(&doc), "Th");
    }

    #[test]
    fn test_segments_split_per_text_node() {
        let doc = sample();
        let range = TextRange::from_offsets(&doc, 2, 12).unwrap();
        let segments = range.segments(&doc);
        assert_eq!(segments.len(), 3);
        assert_eq!((segments[0].start, segments[0].end), (2, 4));
        assert_eq!((segments[1].start, segments[1].end), (0, 5));
        assert_eq!((segments[2].start, segments[2].end), (0, 3));
    }

    #[test]
    fn test_collapsed() {
        let doc = sample();
        let range = TextRange::from_offsets(&doc, 3, 3).unwrap();
        assert!(range.is_collapsed());
        assert_eq!(range.text(&doc), "");
    }
}
