//! Configuration for the anchoring engine

use serde::Deserialize;
use std::env;

use crate::error::{AnchorError, Result};

/// Tunables for anchor creation and fuzzy restoration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnchorConfig {
    /// Maximum length of the stored prefix/suffix context
    pub context_length: usize,
    /// Trailing (prefix) or leading (suffix) chars compared for a partial
    /// context match
    pub partial_context_length: usize,
    /// Longest selection accepted at creation time
    pub max_text_len: usize,
    /// Skip fuzzy matching on documents with more text than this
    pub fuzzy_max_chars: Option<usize>,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        AnchorConfig {
            context_length: 32,
            partial_context_length: 10,
            max_text_len: 10_000,
            fuzzy_max_chars: None,
        }
    }
}

impl AnchorConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = AnchorConfig::default();
        Ok(AnchorConfig {
            context_length: parse_var("ANCHOR_CONTEXT_LENGTH")?
                .unwrap_or(defaults.context_length),
            partial_context_length: parse_var("ANCHOR_PARTIAL_CONTEXT_LENGTH")?
                .unwrap_or(defaults.partial_context_length),
            max_text_len: parse_var("ANCHOR_MAX_TEXT_LEN")?.unwrap_or(defaults.max_text_len),
            fuzzy_max_chars: parse_var("ANCHOR_FUZZY_MAX_CHARS")?.or(defaults.fuzzy_max_chars),
        })
    }
}

fn parse_var(name: &str) -> Result<Option<usize>> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| {
                AnchorError::Config(format!("{} must be a number, got {:?}", name, value))
            }),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(AnchorError::Config(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnchorConfig::default();
        assert_eq!(config.context_length, 32);
        assert_eq!(config.partial_context_length, 10);
        assert_eq!(config.fuzzy_max_chars, None);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: AnchorConfig =
            serde_json::from_str(r#"{"contextLength": 16, "fuzzyMaxChars": 5000}"#).unwrap();
        assert_eq!(config.context_length, 16);
        assert_eq!(config.fuzzy_max_chars, Some(5000));
        assert_eq!(config.max_text_len, 10_000);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("ANCHOR_TEST_GARBAGE", "many");
        assert!(matches!(
            parse_var("ANCHOR_TEST_GARBAGE"),
            Err(AnchorError::Config(_))
        ));
        env::set_var("ANCHOR_TEST_NUMBER", " 42 ");
        assert_eq!(parse_var("ANCHOR_TEST_NUMBER").unwrap(), Some(42));
        assert_eq!(parse_var("ANCHOR_TEST_UNSET_VARIABLE").unwrap(), None);
    }
}
