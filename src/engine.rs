//! Configured anchoring facade
//!
//! `Anchoring` bundles a config with a resolver so hosts create and restore
//! anchors through one object. The free functions use the defaults.

use crate::anchor::{self, AnchorDescriptor};
use crate::config::AnchorConfig;
use crate::dom::{Document, TextRange};
use crate::error::Result;
use crate::resolver::{AnchorResolver, Resolution};

#[derive(Debug)]
pub struct Anchoring {
    config: AnchorConfig,
    resolver: AnchorResolver,
}

impl Anchoring {
    pub fn new(config: AnchorConfig) -> Self {
        let resolver = AnchorResolver::new(config.clone());
        Self { config, resolver }
    }

    /// Use a custom resolver (e.g. with an extra strategy)
    pub fn with_resolver(config: AnchorConfig, resolver: AnchorResolver) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &AnchorConfig {
        &self.config
    }

    pub fn resolver(&self) -> &AnchorResolver {
        &self.resolver
    }

    pub fn create_anchor(&self, doc: &Document, range: &TextRange) -> Result<AnchorDescriptor> {
        anchor::create_anchor_with(doc, range, &self.config)
    }

    /// Run every strategy and report how the anchor was (or was not) found
    pub fn resolve(&self, doc: &Document, descriptor: &AnchorDescriptor) -> Resolution {
        self.resolver.resolve(doc, descriptor)
    }

    pub fn restore_anchor(
        &self,
        doc: &Document,
        descriptor: &AnchorDescriptor,
    ) -> Option<TextRange> {
        self.resolver.restore_anchor(doc, descriptor)
    }
}

impl Default for Anchoring {
    fn default() -> Self {
        Self::new(AnchorConfig::default())
    }
}

/// Restore an anchor with the default configuration
pub fn restore_anchor(doc: &Document, descriptor: &AnchorDescriptor) -> Option<TextRange> {
    AnchorResolver::default().restore_anchor(doc, descriptor)
}
