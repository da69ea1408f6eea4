//! Context fuzzy matcher
//!
//! Last-resort recovery from text alone. The content root is flattened in
//! a single pass, every exact occurrence of the anchor text is scored
//! against the stored prefix/suffix, and the best one is mapped back to
//! text nodes. No approximate text search is attempted: if the exact text
//! is gone, so is the anchor.

use crate::anchor::{AnchorDescriptor, TextContext};
use crate::config::AnchorConfig;
use crate::dom::{Document, FlatText, TextRange};

/// An occurrence of the anchor text and its context score (0-4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Byte offset into the flattened text
    pub byte_start: usize,
    pub score: u8,
}

/// Byte offsets of every occurrence of `needle`, overlapping ones included
pub fn find_occurrences(haystack: &str, needle: &str) -> Vec<usize> {
    let mut found = Vec::new();
    if needle.is_empty() {
        return found;
    }
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let start = from + pos;
        found.push(start);
        // Resume one character later so overlapping matches are seen
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    found
}

/// Score the context around an occurrence spanning `[start, end)` bytes
///
/// Each side scores 2 for an exact context match, 1 when only the
/// `partial_len` chars nearest the occurrence match, 0 otherwise. An empty
/// stored context never scores.
pub fn score_candidate(
    text: &str,
    start: usize,
    end: usize,
    context: &TextContext,
    partial_len: usize,
) -> u8 {
    let before = &text[..start];
    let after = &text[end..];
    let mut score = 0;

    if !context.prefix.is_empty() {
        if before.ends_with(context.prefix.as_str()) {
            score += 2;
        } else if partial_len > 0 && before.ends_with(last_chars(&context.prefix, partial_len))
        {
            score += 1;
        }
    }

    if !context.suffix.is_empty() {
        if after.starts_with(context.suffix.as_str()) {
            score += 2;
        } else if partial_len > 0 && after.starts_with(first_chars(&context.suffix, partial_len))
        {
            score += 1;
        }
    }

    score
}

fn last_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    match s.char_indices().nth(count.saturating_sub(n)) {
        Some((i, _)) => &s[i..],
        None => s,
    }
}

fn first_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

/// Score every occurrence of the anchor text in a flattened document
pub fn candidates(
    flat: &FlatText,
    descriptor: &AnchorDescriptor,
    partial_len: usize,
) -> Vec<Candidate> {
    let text = flat.as_str();
    let len = descriptor.text.len();
    find_occurrences(text, &descriptor.text)
        .into_iter()
        .map(|byte_start| Candidate {
            byte_start,
            score: score_candidate(
                text,
                byte_start,
                byte_start + len,
                &descriptor.context,
                partial_len,
            ),
        })
        .collect()
}

/// Highest-scoring candidate; ties go to the earliest occurrence
pub fn best_candidate(candidates: &[Candidate]) -> Option<Candidate> {
    candidates.iter().fold(None, |best: Option<Candidate>, &c| match best {
        Some(b) if b.score >= c.score => Some(b),
        _ => Some(c),
    })
}

/// Restore an anchor from its text and context
pub fn restore(
    doc: &Document,
    descriptor: &AnchorDescriptor,
    config: &AnchorConfig,
) -> Option<TextRange> {
    if descriptor.text.is_empty() {
        return None;
    }

    let flat = FlatText::build(doc, doc.content_root());
    if let Some(limit) = config.fuzzy_max_chars {
        if flat.char_len() > limit {
            tracing::warn!(
                chars = flat.char_len(),
                limit,
                "Document too large for fuzzy matching"
            );
            return None;
        }
    }

    let scored = candidates(&flat, descriptor, config.partial_context_length);
    let best = best_candidate(&scored)?;
    tracing::trace!(
        occurrences = scored.len(),
        score = best.score,
        "Selected fuzzy candidate"
    );

    let start = flat.byte_to_char(best.byte_start);
    let end = start + descriptor.text.chars().count();
    let start_point = flat.boundary_at_start(start)?;
    let end_point = flat.boundary_at_end(end)?;
    TextRange::new(doc, start_point, end_point).ok()
}
