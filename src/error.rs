//! Error types
//!
//! Errors surface only from anchor creation, document parsing, tree
//! mutation and configuration loading. Restoration never returns them to
//! the caller: a failing strategy is logged and the next one is tried.

use thiserror::Error;

use crate::dom::NodeId;

/// Unified error type for the anchoring engine
#[derive(Debug, Error)]
pub enum AnchorError {
    /// Selection is collapsed or covers no text
    #[error("Selection is empty")]
    EmptySelection,

    /// Selection text exceeds the configured limit
    #[error("Selection too long: {len} characters (max {max})")]
    SelectionTooLong { len: usize, max: usize },

    /// Boundary point does not fit its container
    #[error("Invalid boundary: {0}")]
    InvalidBoundary(String),

    /// Tree mutation would corrupt the document
    #[error("Invalid tree operation: {0}")]
    InvalidTree(String),

    /// Anchor element has no tag name
    #[error("Node {0:?} is not an element")]
    MissingTag(NodeId),

    /// Markup or address could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error (std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Descriptor (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for anchoring operations
pub type Result<T> = std::result::Result<T, AnchorError>;
