//! Highlight anchoring engine
//!
//! Turns a text selection into a durable, serializable anchor and finds
//! that text again after the page has changed:
//! - Anchor creation (structural path, tag-index and text/context addresses)
//! - Restoration through structural, tag-index and fuzzy strategies
//! - Substring-tolerant verification of every restored range
//!
//! The engine only reads the document it is handed; it never mutates it
//! and keeps no state between calls.

use std::collections::HashMap;

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod anchor;
pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod fuzzy;
pub mod resolver;
pub mod structural;
pub mod tag_index;

// Re-export common types
pub use anchor::{create_anchor, create_anchor_with, AnchorDescriptor, TextContext};
pub use config::AnchorConfig;
pub use dom::{BoundaryPoint, Document, NodeId, TextRange};
pub use engine::{restore_anchor, Anchoring};
pub use error::{AnchorError, Result};
pub use resolver::{AnchorResolver, AnchorStrategy, Resolution, StrategyKind};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// A restored anchor as seen from JavaScript
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoredAnchor {
    pub start_offset: usize,
    pub end_offset: usize,
    pub text: String,
    pub strategy: StrategyKind,
}

/// Anchoring engine for browser hosts
///
/// Documents are loaded once under an id; selections and restored ranges
/// are exchanged as char offsets into the flattened content text.
#[wasm_bindgen]
pub struct AnchorEngine {
    anchoring: Anchoring,
    documents: HashMap<String, Document>,
}

#[wasm_bindgen]
impl AnchorEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::from_config(AnchorConfig::default())
    }

    /// Create an engine from a (partial) config object
    #[wasm_bindgen(js_name = "withConfig")]
    pub fn with_config(config: JsValue) -> std::result::Result<AnchorEngine, JsValue> {
        let config: AnchorConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::from_config(config))
    }

    /// Parse markup and keep it under `doc_id`, replacing any previous one
    #[wasm_bindgen(js_name = "loadDocument")]
    pub fn load_document(
        &mut self,
        doc_id: &str,
        markup: &str,
    ) -> std::result::Result<(), JsValue> {
        let doc = Document::parse(markup).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.documents.insert(doc_id.to_string(), doc);
        Ok(())
    }

    #[wasm_bindgen(js_name = "unloadDocument")]
    pub fn unload_document(&mut self, doc_id: &str) {
        self.documents.remove(doc_id);
    }

    #[wasm_bindgen(js_name = "getLoadedDocuments")]
    pub fn get_loaded_documents(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }

    /// Create an anchor for a selection given as flattened offsets
    #[wasm_bindgen(js_name = "createAnchor")]
    pub fn create_anchor(
        &self,
        doc_id: &str,
        start_offset: usize,
        end_offset: usize,
    ) -> std::result::Result<JsValue, JsValue> {
        let descriptor = self
            .anchor_offsets(doc_id, start_offset, end_offset)
            .map_err(|e| JsValue::from_str(&e))?;
        serde_wasm_bindgen::to_value(&descriptor).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Restore a descriptor object; resolves to `null` when not found
    #[wasm_bindgen(js_name = "restoreAnchor")]
    pub fn restore_anchor(
        &self,
        doc_id: &str,
        descriptor: JsValue,
    ) -> std::result::Result<JsValue, JsValue> {
        let descriptor: AnchorDescriptor = serde_wasm_bindgen::from_value(descriptor)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let restored = self
            .restore_descriptor(doc_id, &descriptor)
            .map_err(|e| JsValue::from_str(&e))?;

        match restored {
            Some(restored) => serde_wasm_bindgen::to_value(&restored)
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::NULL),
        }
    }
}

impl AnchorEngine {
    pub fn from_config(config: AnchorConfig) -> Self {
        Self {
            anchoring: Anchoring::new(config),
            documents: HashMap::new(),
        }
    }

    fn document(&self, doc_id: &str) -> std::result::Result<&Document, String> {
        self.documents
            .get(doc_id)
            .ok_or_else(|| format!("Document not found: {}", doc_id))
    }

    /// Native counterpart of `createAnchor`
    pub fn anchor_offsets(
        &self,
        doc_id: &str,
        start_offset: usize,
        end_offset: usize,
    ) -> std::result::Result<AnchorDescriptor, String> {
        let doc = self.document(doc_id)?;
        let range = TextRange::from_offsets(doc, start_offset, end_offset)
            .map_err(|e| e.to_string())?;
        self.anchoring
            .create_anchor(doc, &range)
            .map_err(|e| e.to_string())
    }

    /// Native counterpart of `restoreAnchor`
    pub fn restore_descriptor(
        &self,
        doc_id: &str,
        descriptor: &AnchorDescriptor,
    ) -> std::result::Result<Option<RestoredAnchor>, String> {
        let doc = self.document(doc_id)?;
        let resolution = self.anchoring.resolve(doc, descriptor);
        let (Some(range), Some(strategy)) = (resolution.range, resolution.strategy) else {
            return Ok(None);
        };
        // A verified range can still sit outside the content root (e.g. in
        // <head>); JavaScript cannot address it by offsets
        let Some((start_offset, end_offset)) = range.offsets(doc) else {
            tracing::debug!(%strategy, "Restored range lies outside the content root");
            return Ok(None);
        };
        Ok(Some(RestoredAnchor {
            start_offset,
            end_offset,
            text: range.text(doc),
            strategy,
        }))
    }
}

impl Default for AnchorEngine {
    fn default() -> Self {
        Self::new()
    }
}
