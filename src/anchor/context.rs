//! Prefix/suffix context capture

use super::types::TextContext;
use crate::config::AnchorConfig;
use crate::dom::{Document, FlatText, TextRange};

/// Capture the text immediately around a range
///
/// Uses the same flattened content-root text the fuzzy matcher searches,
/// so an unchanged page always reproduces the stored context exactly.
/// Either side may be shorter than `context_length` at the edges of the
/// content, and both are empty when the range lies outside it.
pub fn capture_context(doc: &Document, range: &TextRange, config: &AnchorConfig) -> TextContext {
    let flat = FlatText::build(doc, doc.content_root());
    let (Some(start), Some(end)) = (
        flat.offset_of(doc, range.start()),
        flat.offset_of(doc, range.end()),
    ) else {
        return TextContext::default();
    };

    let prefix_start = start.saturating_sub(config.context_length);
    let suffix_end = (end + config.context_length).min(flat.char_len());

    TextContext {
        prefix: flat.slice(prefix_start, start).to_string(),
        suffix: flat.slice(end, suffix_end).to_string(),
    }
}
