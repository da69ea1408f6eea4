//! Document model
//!
//! An explicit, arena-backed document tree that the anchoring engine reads
//! from. Nothing in the engine touches a global document: every operation
//! receives a `&Document`.
//!
//! - `Document`: node arena, parsing, construction and queries
//! - `FlatText`: flattened text of a subtree with a node index
//! - `TextRange`: a span between two boundary points

mod document;
mod flatten;
mod range;
mod types;

pub use document::{Descendants, Document};
pub use flatten::{FlatText, Segment};
pub use range::TextRange;
pub use types::{BoundaryPoint, NodeId, NodeKind, TextSegment};
