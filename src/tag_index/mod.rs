//! Tag-index addresser
//!
//! Addresses a boundary by (tag name, occurrence among all elements with
//! that tag in document order, char offset into the element's flattened
//! text). Insertions outside the anchor element's subtree that do not
//! precede it in document order leave the address intact.

use crate::anchor::TagIndexAddress;
use crate::dom::{BoundaryPoint, Document, NodeId, TextRange};
use crate::error::{AnchorError, Result};

/// Anchor element, tag, occurrence and text offset for one boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagBoundary {
    pub tag: String,
    pub occurrence: usize,
    pub text_offset: usize,
}

/// Compute the tag-index address of both range boundaries
pub fn compute_address(doc: &Document, range: &TextRange) -> Result<TagIndexAddress> {
    let start = compute_boundary(doc, range.start())?;
    let end = compute_boundary(doc, range.end())?;
    Ok(TagIndexAddress {
        start_tag: start.tag,
        start_tag_occurrence: start.occurrence,
        start_text_offset: start.text_offset,
        end_tag: end.tag,
        end_tag_occurrence: end.occurrence,
        end_text_offset: end.text_offset,
    })
}

/// Compute the tag-index address of a single boundary point
///
/// Text containers are anchored to their parent element; element
/// containers are their own anchor and record offset 0.
pub fn compute_boundary(doc: &Document, point: BoundaryPoint) -> Result<TagBoundary> {
    let (anchor, text_offset) = if doc.is_text(point.node) {
        let parent = doc
            .parent(point.node)
            .ok_or_else(|| AnchorError::InvalidBoundary(format!("{} is detached", point.node)))?;
        (parent, text_offset_within(doc, parent, point.node, point.offset))
    } else {
        (point.node, 0)
    };

    let tag = doc
        .tag_name(anchor)
        .ok_or(AnchorError::MissingTag(anchor))?
        .to_string();
    let occurrence = doc
        .elements_by_tag_name(&tag)
        .iter()
        .position(|&el| el == anchor)
        .ok_or_else(|| AnchorError::InvalidBoundary(format!("{} is detached", anchor)))?;

    Ok(TagBoundary {
        tag,
        occurrence,
        text_offset,
    })
}

/// Char offset of `(text_node, offset)` within the flattened text of
/// `element`
fn text_offset_within(doc: &Document, element: NodeId, text_node: NodeId, offset: usize) -> usize {
    let before: usize = doc
        .text_nodes(element)
        .take_while(|&n| n != text_node)
        .map(|n| doc.boundary_len(n))
        .sum();
    before + offset
}

/// Locate the text node and in-node offset for a char offset within an
/// element's flattened text
///
/// Offsets past the end clamp to the end of the last text node. Returns
/// `None` when the element contains no text node at all.
pub fn locate_text_offset(doc: &Document, element: NodeId, offset: usize) -> Option<BoundaryPoint> {
    let mut consumed = 0;
    let mut last = None;
    for node in doc.text_nodes(element) {
        let len = doc.boundary_len(node);
        if consumed + len >= offset {
            return Some(BoundaryPoint::new(node, offset - consumed));
        }
        consumed += len;
        last = Some(BoundaryPoint::new(node, len));
    }
    last
}

/// Resolve a single boundary: element by tag occurrence, then text offset
pub fn resolve_boundary(
    doc: &Document,
    tag: &str,
    occurrence: usize,
    text_offset: usize,
) -> Option<BoundaryPoint> {
    let element = *doc.elements_by_tag_name(tag).get(occurrence)?;
    locate_text_offset(doc, element, text_offset)
}

/// Resolve a tag-index address into a range
pub fn resolve_address(doc: &Document, address: &TagIndexAddress) -> Option<TextRange> {
    let start = resolve_boundary(
        doc,
        &address.start_tag,
        address.start_tag_occurrence,
        address.start_text_offset,
    )?;
    let end = resolve_boundary(
        doc,
        &address.end_tag,
        address.end_tag_occurrence,
        address.end_text_offset,
    )?;
    TextRange::new(doc, start, end).ok()
}
