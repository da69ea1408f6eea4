//! Structural addresser
//!
//! Computes and evaluates root-to-node paths:
//!
//! ```text
//! /html/body/div[2]/p[1]/text()[3]
//! │          │      │    └── 3rd text child of the p
//! │          │      └─────── 1st p among its p siblings
//! │          └────────────── 2nd div among its div siblings
//! └───────────────────────── fixed token for the body element
//!
//! //*[@id="intro"]/text()[1]
//! └── elements with a unique id short-circuit to an id reference
//! ```
//!
//! Evaluation never fails loudly: anything that does not resolve yields
//! `None`.

mod parser;
mod types;

pub use parser::{parse_path, PathParseError};
pub use types::{PathStart, PathStep, StructuralPath};

use crate::dom::{Document, NodeId, NodeKind};

/// Compute the structural path of a node
///
/// Returns `None` for detached nodes.
pub fn compute_path(doc: &Document, node: NodeId) -> Option<StructuralPath> {
    match doc.kind(node) {
        NodeKind::Document => (node == doc.root()).then(StructuralPath::document),
        NodeKind::Text(_) => {
            let parent = doc.parent(node)?;
            let index = 1 + doc
                .children(parent)
                .iter()
                .take_while(|&&c| c != node)
                .filter(|&&c| doc.is_text(c))
                .count();
            Some(compute_path(doc, parent)?.child_text(index))
        }
        NodeKind::Element { tag, attributes } => {
            if let Some((_, id)) = attributes.iter().find(|(name, _)| name == "id") {
                if !id.is_empty() && doc.elements_with_id(id).as_slice() == [node] {
                    return Some(StructuralPath::from_id(id.as_str()));
                }
            }
            if doc.body() == Some(node) {
                return Some(StructuralPath::body());
            }
            let parent = doc.parent(node)?;
            let index = 1 + doc
                .children(parent)
                .iter()
                .take_while(|&&c| c != node)
                .filter(|&&c| doc.tag_name(c) == Some(tag.as_str()))
                .count();
            Some(compute_path(doc, parent)?.child_element(tag.as_str(), Some(index)))
        }
    }
}

/// Compute the structural address string of a node
///
/// Detached nodes and the document node get an empty address, which never
/// resolves.
pub fn compute_address(doc: &Document, node: NodeId) -> String {
    compute_path(doc, node)
        .map(|path| path.to_string())
        .unwrap_or_default()
}

/// Evaluate a parsed path against the document
pub fn resolve_path(doc: &Document, path: &StructuralPath) -> Option<NodeId> {
    let mut steps = path.steps.as_slice();
    let mut current = match &path.start {
        PathStart::Document if steps.starts_with(&StructuralPath::body().steps) => {
            // The body token names the body wherever it sits in the tree
            steps = &steps[2..];
            doc.body()?
        }
        PathStart::Document => doc.root(),
        PathStart::Id(id) => doc.element_by_id(id)?,
    };

    for step in steps {
        current = match step {
            PathStep::Element { tag, index } => doc
                .element_children(current)
                .filter(|&c| doc.tag_name(c) == Some(tag.as_str()))
                .nth(index.unwrap_or(1).checked_sub(1)?)?,
            PathStep::Text { index } => doc
                .children(current)
                .iter()
                .copied()
                .filter(|&c| doc.is_text(c))
                .nth(index.checked_sub(1)?)?,
        };
    }

    Some(current)
}

/// Evaluate an address string against the document
pub fn resolve_address(doc: &Document, address: &str) -> Option<NodeId> {
    match parse_path(address) {
        Ok(path) => resolve_path(doc, &path),
        Err(e) => {
            tracing::debug!(address, error = %e, "Unparseable structural address");
            None
        }
    }
}
