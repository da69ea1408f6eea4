//! Resolution strategies
//!
//! Each strategy turns a descriptor into a candidate range using one
//! addressing scheme. A strategy returns `Ok(None)` when its address does
//! not resolve (including when the descriptor lacks the fields it needs)
//! and `Err` when resolving blew up; the resolver treats both as failure.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::anchor::AnchorDescriptor;
use crate::config::AnchorConfig;
use crate::dom::{BoundaryPoint, Document, TextRange};
use crate::error::{AnchorError, Result};
use crate::{fuzzy, structural, tag_index};

/// Which addressing scheme produced a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyKind {
    Structural,
    TagIndex,
    Fuzzy,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Structural => "structural",
            StrategyKind::TagIndex => "tagIndex",
            StrategyKind::Fuzzy => "fuzzy",
        };
        f.write_str(name)
    }
}

/// One way of turning a descriptor back into a range
pub trait AnchorStrategy {
    fn kind(&self) -> StrategyKind;

    fn try_resolve(&self, doc: &Document, descriptor: &AnchorDescriptor)
        -> Result<Option<TextRange>>;
}

/// Resolves the structural paths of both boundaries
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralStrategy;

impl AnchorStrategy for StructuralStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Structural
    }

    fn try_resolve(
        &self,
        doc: &Document,
        descriptor: &AnchorDescriptor,
    ) -> Result<Option<TextRange>> {
        let Some(address) = &descriptor.structural else {
            return Ok(None);
        };

        let start_path = structural::parse_path(&address.start_path)
            .map_err(|e| AnchorError::Parse(e.to_string()))?;
        let end_path = structural::parse_path(&address.end_path)
            .map_err(|e| AnchorError::Parse(e.to_string()))?;

        let (Some(start), Some(end)) = (
            structural::resolve_path(doc, &start_path),
            structural::resolve_path(doc, &end_path),
        ) else {
            return Ok(None);
        };

        TextRange::new(
            doc,
            BoundaryPoint::new(start, address.start_offset),
            BoundaryPoint::new(end, address.end_offset),
        )
        .map(Some)
    }
}

/// Resolves tag occurrences and text offsets of both boundaries
#[derive(Debug, Clone, Copy, Default)]
pub struct TagIndexStrategy;

impl AnchorStrategy for TagIndexStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TagIndex
    }

    fn try_resolve(
        &self,
        doc: &Document,
        descriptor: &AnchorDescriptor,
    ) -> Result<Option<TextRange>> {
        Ok(descriptor
            .tag_index
            .as_ref()
            .and_then(|address| tag_index::resolve_address(doc, address)))
    }
}

/// Searches the document text, ranking occurrences by context
#[derive(Debug, Clone, Default)]
pub struct FuzzyStrategy {
    config: AnchorConfig,
}

impl FuzzyStrategy {
    pub fn new(config: AnchorConfig) -> Self {
        Self { config }
    }
}

impl AnchorStrategy for FuzzyStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fuzzy
    }

    fn try_resolve(
        &self,
        doc: &Document,
        descriptor: &AnchorDescriptor,
    ) -> Result<Option<TextRange>> {
        Ok(fuzzy::restore(doc, descriptor, &self.config))
    }
}
