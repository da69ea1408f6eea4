//! Anchor descriptors and their creation
//!
//! A descriptor records the same span three ways (structural paths,
//! tag-index offsets, exact text with context), all computed from one
//! range at creation time. It is never updated afterwards.

mod context;
mod types;

pub use context::capture_context;
pub use types::{AnchorDescriptor, LegacyAnchor, StructuralAddress, TagIndexAddress, TextContext};

use crate::config::AnchorConfig;
use crate::dom::{Document, TextRange};
use crate::error::{AnchorError, Result};
use crate::{structural, tag_index};

/// Create a descriptor for a selection
///
/// Collapsed and text-less selections are rejected, as are selections
/// longer than `config.max_text_len`.
pub fn create_anchor_with(
    doc: &Document,
    range: &TextRange,
    config: &AnchorConfig,
) -> Result<AnchorDescriptor> {
    // Ranges are plain data; make sure this one still fits the document
    let range = TextRange::new(doc, range.start(), range.end())?;
    if range.is_collapsed() {
        return Err(AnchorError::EmptySelection);
    }

    let text = range.text(doc);
    if text.is_empty() {
        return Err(AnchorError::EmptySelection);
    }
    let len = text.chars().count();
    if len > config.max_text_len {
        return Err(AnchorError::SelectionTooLong {
            len,
            max: config.max_text_len,
        });
    }

    let start_path = structural::compute_address(doc, range.start().node);
    let end_path = structural::compute_address(doc, range.end().node);
    let structural = if start_path.is_empty() || end_path.is_empty() {
        None
    } else {
        Some(StructuralAddress {
            start_path,
            start_offset: range.start().offset,
            end_path,
            end_offset: range.end().offset,
        })
    };

    let tag_index = match tag_index::compute_address(doc, &range) {
        Ok(address) => Some(address),
        Err(e) => {
            tracing::debug!(error = %e, "Selection has no tag-index address");
            None
        }
    };

    let context = capture_context(doc, &range, config);

    tracing::debug!(
        chars = len,
        structural = structural.is_some(),
        tag_index = tag_index.is_some(),
        "Created anchor"
    );

    Ok(AnchorDescriptor {
        structural,
        tag_index,
        text,
        context,
    })
}

/// Create a descriptor with the default configuration
pub fn create_anchor(doc: &Document, range: &TextRange) -> Result<AnchorDescriptor> {
    create_anchor_with(doc, range, &AnchorConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::BoundaryPoint;

    const PAGE: &str = "<body><p>The quick brown fox</p><p>jumps over</p></body>";

    #[test]
    fn test_create_worked_example() {
        let doc = Document::parse(PAGE).unwrap();
        let range = TextRange::from_offsets(&doc, 4, 15).unwrap();
        let anchor = create_anchor(&doc, &range).unwrap();

        assert_eq!(anchor.text, "quick brown");
        let tag_index = anchor.tag_index.unwrap();
        assert_eq!(tag_index.start_tag, "p");
        assert_eq!(tag_index.start_tag_occurrence, 0);
        assert_eq!(tag_index.start_text_offset, 4);
        assert_eq!(tag_index.end_tag, "p");
        assert_eq!(tag_index.end_tag_occurrence, 0);
        assert_eq!(tag_index.end_text_offset, 15);

        let structural = anchor.structural.unwrap();
        assert_eq!(structural.start_path, "/html/body/p[1]/text()[1]");
        assert_eq!(structural.start_offset, 4);
        assert_eq!(structural.end_offset, 15);

        assert_eq!(anchor.context.prefix, "The ");
        assert_eq!(anchor.context.suffix, " foxjumps over");
    }

    #[test]
    fn test_rejects_collapsed_selection() {
        let doc = Document::parse(PAGE).unwrap();
        let range = TextRange::from_offsets(&doc, 3, 3).unwrap();
        assert!(matches!(
            create_anchor(&doc, &range),
            Err(AnchorError::EmptySelection)
        ));
    }

    #[test]
    fn test_rejects_textless_selection() {
        let doc = Document::parse("<body><p>a</p><hr/><p>b</p></body>").unwrap();
        let hr = doc.elements_by_tag_name("hr")[0];
        let range = TextRange::new(&doc, BoundaryPoint::new(hr, 0), BoundaryPoint::new(hr, 0))
            .unwrap();
        assert!(create_anchor(&doc, &range).is_err());

        let body = doc.body().unwrap();
        let range = TextRange::new(&doc, BoundaryPoint::new(body, 1), BoundaryPoint::new(body, 2))
            .unwrap();
        assert!(matches!(
            create_anchor(&doc, &range),
            Err(AnchorError::EmptySelection)
        ));
    }

    #[test]
    fn test_rejects_long_selection() {
        let doc = Document::parse(PAGE).unwrap();
        let range = TextRange::from_offsets(&doc, 0, 19).unwrap();
        let config = AnchorConfig {
            max_text_len: 10,
            ..AnchorConfig::default()
        };
        assert!(matches!(
            create_anchor_with(&doc, &range, &config),
            Err(AnchorError::SelectionTooLong { len: 19, max: 10 })
        ));
    }

    #[test]
    fn test_rejects_stale_range() {
        let mut doc = Document::parse(PAGE).unwrap();
        let range = TextRange::from_offsets(&doc, 4, 15).unwrap();
        let text = range.start().node;
        doc.set_text(text, "The").unwrap();
        assert!(matches!(
            create_anchor(&doc, &range),
            Err(AnchorError::InvalidBoundary(_))
        ));
    }

    #[test]
    fn test_creation_is_deterministic() {
        let doc = Document::parse(PAGE).unwrap();
        let range = TextRange::from_offsets(&doc, 10, 24).unwrap();
        assert_eq!(
            create_anchor(&doc, &range).unwrap(),
            create_anchor(&doc, &range).unwrap()
        );
    }

    #[test]
    fn test_text_under_document_node_has_no_tag_index() {
        let mut doc = Document::new();
        let text = doc.create_text("loose text");
        doc.append_child(doc.root(), text).unwrap();
        let range = TextRange::from_offsets(&doc, 0, 5).unwrap();
        let anchor = create_anchor(&doc, &range).unwrap();
        assert_eq!(anchor.text, "loose");
        assert!(anchor.tag_index.is_none());
        assert_eq!(anchor.structural.unwrap().start_path, "/text()[1]");
    }
}
