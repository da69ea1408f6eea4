//! Anchor resolver
//!
//! Runs an ordered list of strategies against a descriptor and stops at the
//! first range whose text verifies. The default order is structural, then
//! tag-index, then fuzzy. A strategy that errors, finds nothing or produces
//! text that fails verification just hands over to the next one.

mod strategy;

pub use strategy::{
    AnchorStrategy, FuzzyStrategy, StrategyKind, StructuralStrategy, TagIndexStrategy,
};

use serde::Serialize;

use crate::anchor::AnchorDescriptor;
use crate::config::AnchorConfig;
use crate::dom::{Document, TextRange};

/// What happened when one strategy was tried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AttemptOutcome {
    /// Address did not resolve or the descriptor lacked it
    Unresolved,
    /// Strategy raised an error
    Errored,
    /// Resolved, but the text did not match
    Rejected,
    Verified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub strategy: StrategyKind,
    pub outcome: AttemptOutcome,
}

/// Result of running the resolver
#[derive(Debug, Clone)]
pub struct Resolution {
    pub range: Option<TextRange>,
    pub strategy: Option<StrategyKind>,
    /// Every strategy tried, in order
    pub attempts: Vec<Attempt>,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        self.range.is_some()
    }
}

/// Substring-tolerant text check
///
/// Both sides are trimmed. An empty expected text always passes; otherwise
/// the texts must be equal or one must contain the other, so an empty
/// candidate passes too.
pub fn verify_text(candidate: &str, expected: &str) -> bool {
    let candidate = candidate.trim();
    let expected = expected.trim();
    if expected.is_empty() {
        return true;
    }
    candidate == expected || candidate.contains(expected) || expected.contains(candidate)
}

/// Check a resolved range against the text a descriptor recorded
pub fn verify(doc: &Document, range: &TextRange, expected: &str) -> bool {
    verify_text(&range.text(doc), expected)
}

/// Ordered strategy dispatcher
pub struct AnchorResolver {
    strategies: Vec<Box<dyn AnchorStrategy>>,
}

impl AnchorResolver {
    /// Resolver with the default strategy order
    pub fn new(config: AnchorConfig) -> Self {
        Self::with_strategies(Self::default_strategies(config))
    }

    pub fn default_strategies(config: AnchorConfig) -> Vec<Box<dyn AnchorStrategy>> {
        vec![
            Box::new(StructuralStrategy),
            Box::new(TagIndexStrategy),
            Box::new(FuzzyStrategy::new(config)),
        ]
    }

    pub fn with_strategies(strategies: Vec<Box<dyn AnchorStrategy>>) -> Self {
        Self { strategies }
    }

    /// Append a strategy after the existing ones
    pub fn push(&mut self, strategy: Box<dyn AnchorStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn strategies(&self) -> impl Iterator<Item = StrategyKind> + '_ {
        self.strategies.iter().map(|s| s.kind())
    }

    pub fn resolve(&self, doc: &Document, descriptor: &AnchorDescriptor) -> Resolution {
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let kind = strategy.kind();
            let outcome = match strategy.try_resolve(doc, descriptor) {
                Ok(Some(range)) => {
                    if verify(doc, &range, &descriptor.text) {
                        tracing::debug!(strategy = %kind, "Anchor verified");
                        attempts.push(Attempt {
                            strategy: kind,
                            outcome: AttemptOutcome::Verified,
                        });
                        if kind == StrategyKind::Fuzzy && attempts.len() > 1 {
                            tracing::info!(
                                text_len = descriptor.text.chars().count(),
                                "Fuzzy matching recovered anchor"
                            );
                        }
                        return Resolution {
                            range: Some(range),
                            strategy: Some(kind),
                            attempts,
                        };
                    }
                    tracing::debug!(strategy = %kind, "Resolved text failed verification");
                    AttemptOutcome::Rejected
                }
                Ok(None) => {
                    tracing::debug!(strategy = %kind, "Strategy did not resolve");
                    AttemptOutcome::Unresolved
                }
                Err(e) => {
                    tracing::debug!(strategy = %kind, error = %e, "Strategy failed");
                    AttemptOutcome::Errored
                }
            };
            attempts.push(Attempt {
                strategy: kind,
                outcome,
            });
        }

        tracing::warn!(attempts = attempts.len(), "Anchor could not be restored");
        Resolution {
            range: None,
            strategy: None,
            attempts,
        }
    }

    /// Restore a descriptor to a range, or `None` if every strategy failed
    pub fn restore_anchor(
        &self,
        doc: &Document,
        descriptor: &AnchorDescriptor,
    ) -> Option<TextRange> {
        self.resolve(doc, descriptor).range
    }
}

impl Default for AnchorResolver {
    fn default() -> Self {
        Self::new(AnchorConfig::default())
    }
}

impl std::fmt::Debug for AnchorResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.strategies()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::create_anchor;
    use crate::error::{AnchorError, Result};

    const PAGE: &str = "<body><p>The quick brown fox</p><p>jumps over</p></body>";

    struct Failing;

    impl AnchorStrategy for Failing {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Structural
        }

        fn try_resolve(&self, _: &Document, _: &AnchorDescriptor) -> Result<Option<TextRange>> {
            Err(AnchorError::Parse("boom".to_string()))
        }
    }

    /// Always returns the first five characters of the content
    struct Wrong;

    impl AnchorStrategy for Wrong {
        fn kind(&self) -> StrategyKind {
            StrategyKind::TagIndex
        }

        fn try_resolve(&self, doc: &Document, _: &AnchorDescriptor) -> Result<Option<TextRange>> {
            TextRange::from_offsets(doc, 0, 5).map(Some)
        }
    }

    #[test]
    fn test_verify_text() {
        assert!(verify_text("quick brown", "quick brown"));
        assert!(verify_text("  quick brown\n", "quick brown"));
        assert!(verify_text("the quick brown fox", "quick brown"));
        assert!(verify_text("quick", "quick brown"));
        assert!(verify_text("anything", ""));
        assert!(verify_text("", "   "));
        assert!(!verify_text("slow green", "quick brown"));
        // An empty candidate is contained in any expected text
        assert!(verify_text("", "quick"));
        assert!(verify_text(" \n\t", "quick"));
    }

    #[test]
    fn test_stable_document_uses_structural() {
        let doc = Document::parse(PAGE).unwrap();
        let range = TextRange::from_offsets(&doc, 4, 15).unwrap();
        let anchor = create_anchor(&doc, &range).unwrap();

        let resolution = AnchorResolver::default().resolve(&doc, &anchor);
        assert_eq!(resolution.strategy, Some(StrategyKind::Structural));
        assert_eq!(resolution.range.unwrap(), range);
        assert_eq!(resolution.attempts.len(), 1);
    }

    #[test]
    fn test_falls_through_errors_and_rejections() {
        let doc = Document::parse(PAGE).unwrap();
        let anchor = AnchorDescriptor::from_text("jumps", "fox", " over");

        let mut resolver =
            AnchorResolver::with_strategies(vec![Box::new(Failing), Box::new(Wrong)]);
        resolver.push(Box::new(FuzzyStrategy::default()));

        let resolution = resolver.resolve(&doc, &anchor);
        assert_eq!(resolution.strategy, Some(StrategyKind::Fuzzy));
        assert_eq!(resolution.range.unwrap().text(&doc), "jumps");
        let outcomes: Vec<_> = resolution.attempts.iter().map(|a| a.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                AttemptOutcome::Errored,
                AttemptOutcome::Rejected,
                AttemptOutcome::Verified
            ]
        );
    }

    #[test]
    fn test_all_strategies_fail() {
        let doc = Document::parse(PAGE).unwrap();
        let anchor = AnchorDescriptor::from_text("purple elephant", "", "");

        let resolution = AnchorResolver::default().resolve(&doc, &anchor);
        assert!(!resolution.is_resolved());
        assert!(resolution.strategy.is_none());
        assert!(resolution
            .attempts
            .iter()
            .all(|a| a.outcome == AttemptOutcome::Unresolved));
        assert!(AnchorResolver::default().restore_anchor(&doc, &anchor).is_none());
    }

    #[test]
    fn test_empty_resolver_finds_nothing() {
        let doc = Document::parse(PAGE).unwrap();
        let anchor = AnchorDescriptor::from_text("quick", "", "");
        let resolution = AnchorResolver::with_strategies(Vec::new()).resolve(&doc, &anchor);
        assert!(resolution.range.is_none());
        assert!(resolution.attempts.is_empty());
    }

    #[test]
    fn test_default_order() {
        let kinds: Vec<_> = AnchorResolver::default().strategies().collect();
        assert_eq!(
            kinds,
            vec![StrategyKind::Structural, StrategyKind::TagIndex, StrategyKind::Fuzzy]
        );
    }
}
