//! Anchor descriptor types
//!
//! The descriptor is pure data: no live node references, safe to persist
//! verbatim. One descriptor carries several independent addresses for the
//! same span so resolution can fall back from one to the next.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Durable description of a highlighted span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorDescriptor {
    /// Path-based addresses of both boundaries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structural: Option<StructuralAddress>,
    /// Tag occurrence + text offset addresses of both boundaries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_index: Option<TagIndexAddress>,
    /// Exact text of the original range
    pub text: String,
    /// Text surrounding the original range
    #[serde(default)]
    pub context: TextContext,
}

/// Structural (path) addresses of the range boundaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralAddress {
    pub start_path: String,
    pub start_offset: usize,
    pub end_path: String,
    pub end_offset: usize,
}

/// Tag-index addresses of the range boundaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagIndexAddress {
    pub start_tag: String,
    /// 0-based position among all `start_tag` elements in document order
    pub start_tag_occurrence: usize,
    pub start_text_offset: usize,
    pub end_tag: String,
    pub end_tag_occurrence: usize,
    pub end_text_offset: usize,
}

/// Prefix and suffix text captured around the range
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContext {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

/// Flat record format used by older stored highlights
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyAnchor {
    #[serde(rename = "startXPath")]
    pub start_xpath: Option<String>,
    pub start_offset: Option<usize>,
    #[serde(rename = "endXPath")]
    pub end_xpath: Option<String>,
    pub end_offset: Option<usize>,
    pub start_tag: Option<String>,
    pub start_tag_index: Option<i64>,
    pub start_text_offset: Option<i64>,
    pub end_tag: Option<String>,
    pub end_tag_index: Option<i64>,
    pub end_text_offset: Option<i64>,
    pub text: String,
    pub context: Option<TextContext>,
}

const LEGACY_KEYS: [&str; 3] = ["startXPath", "startTagIndex", "endXPath"];

impl AnchorDescriptor {
    /// Descriptor carrying only text and context (fuzzy matching only)
    pub fn from_text(text: &str, prefix: &str, suffix: &str) -> Self {
        Self {
            structural: None,
            tag_index: None,
            text: text.to_string(),
            context: TextContext {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored descriptor, accepting the legacy flat format too
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let is_legacy = value
            .as_object()
            .map(|fields| LEGACY_KEYS.iter().any(|k| fields.contains_key(*k)))
            .unwrap_or(false);

        if is_legacy {
            let legacy: LegacyAnchor = serde_json::from_value(value)?;
            Ok(legacy.into())
        } else {
            Ok(serde_json::from_value(value)?)
        }
    }
}

impl From<LegacyAnchor> for AnchorDescriptor {
    fn from(legacy: LegacyAnchor) -> Self {
        let structural = match (legacy.start_xpath, legacy.end_xpath) {
            (Some(start_path), Some(end_path))
                if !start_path.is_empty() && !end_path.is_empty() =>
            {
                Some(StructuralAddress {
                    start_path,
                    start_offset: legacy.start_offset.unwrap_or(0),
                    end_path,
                    end_offset: legacy.end_offset.unwrap_or(0),
                })
            }
            _ => None,
        };

        // -1 marks an element that could not be indexed
        let non_negative = |v: Option<i64>| v.and_then(|n| usize::try_from(n).ok());
        let tag_index = match (
            legacy.start_tag,
            non_negative(legacy.start_tag_index),
            legacy.end_tag,
            non_negative(legacy.end_tag_index),
        ) {
            (Some(start_tag), Some(start_occurrence), Some(end_tag), Some(end_occurrence)) => {
                Some(TagIndexAddress {
                    start_tag,
                    start_tag_occurrence: start_occurrence,
                    start_text_offset: non_negative(legacy.start_text_offset).unwrap_or(0),
                    end_tag,
                    end_tag_occurrence: end_occurrence,
                    end_text_offset: non_negative(legacy.end_text_offset).unwrap_or(0),
                })
            }
            _ => None,
        };

        Self {
            structural,
            tag_index,
            text: legacy.text,
            context: legacy.context.unwrap_or_default(),
        }
    }
}
