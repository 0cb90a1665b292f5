//! Best-path queries: is the typed input still on a shortest way to the
//! target, and what is left to type.

use tracing::{debug, debug_span};

use crate::forward::{Converted, ForwardRuleSet, InputStream};
use crate::inverse::InverseRuleSet;
use crate::rule::{RuleElement, RuleError};
use crate::settings::Settings;
use crate::table::{builtin_rules, Flavor, TableError};

/// Answer to a best-path query for an input that is still on a valid path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestPath {
    /// Target characters already produced by the committed input.
    pub committed: usize,
    /// Typed characters behind `committed`. Anything typed past them is
    /// still undecided.
    pub consumed: usize,
    /// Fewest further keystrokes that complete the target. Empty on an exact
    /// match.
    pub remaining: String,
}

impl BestPath {
    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// Forward and inverse rule sets built from one table.
pub struct TypingEngine {
    forward: ForwardRuleSet,
    inverse: InverseRuleSet,
}

impl TypingEngine {
    pub fn new<I>(elements: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = RuleElement>,
    {
        let forward = ForwardRuleSet::new(elements)?;
        let inverse = InverseRuleSet::new(&forward);
        Ok(Self { forward, inverse })
    }

    /// Engine over the embedded default table.
    pub fn builtin(flavor: Flavor) -> Self {
        Self::new(builtin_rules(flavor)).expect("default romaji table must be valid")
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, TableError> {
        Ok(Self::new(settings.rules()?)?)
    }

    pub fn forward(&self) -> &ForwardRuleSet {
        &self.forward
    }

    pub fn inverse(&self) -> &InverseRuleSet {
        &self.inverse
    }

    pub fn convert(&self, input: &str) -> Converted {
        self.forward.convert(input)
    }

    /// Shortest input producing `target` from scratch.
    pub fn shortest_input(&self, target: &str) -> Option<String> {
        self.inverse.find_shortest_input("", target)
    }

    /// `None` when `input` has left every path to `target`.
    pub fn best_path(&self, input: &str, target: &str) -> Option<BestPath> {
        let _span = debug_span!("best_path", input_len = input.len(), target_len = target.len())
            .entered();

        if input.is_empty() {
            return self.shortest_input(target).map(|remaining| BestPath {
                committed: 0,
                consumed: 0,
                remaining,
            });
        }

        let mut stream = InputStream::new(input);
        let mut converted = String::new();
        let mut trail = Vec::new();
        self.forward.convert_into(&mut stream, &mut converted, Some(&mut trail));

        let Some(rest) = target.strip_prefix(converted.as_str()) else {
            debug!(converted = %converted, "input diverged from target");
            return None;
        };
        let committed = converted.chars().count();
        let consumed = self.forward.typed_len_for(committed, &trail);
        let residue = stream.as_str();

        if rest.is_empty() {
            return residue.is_empty().then(|| BestPath {
                committed,
                consumed,
                remaining: String::new(),
            });
        }

        let path = self.inverse.find_shortest_input(residue, rest)?;
        // The search only returns paths that start with the residue.
        let remaining = path.get(residue.len()..).unwrap_or_default().to_string();
        debug!(committed, consumed, remaining = %remaining);
        Some(BestPath {
            committed,
            consumed,
            remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> TypingEngine {
        TypingEngine::builtin(Flavor::Any)
    }

    #[test]
    fn test_empty_input_matches_direct_search() {
        let engine = engine();
        for target in ["きょうはいいひだったね", "がっこう", "ん", "らーめん。"] {
            let best = engine.best_path("", target).unwrap();
            assert_eq!(best.committed, 0);
            assert_eq!(Some(best.remaining), engine.shortest_input(target));
        }
    }

    #[test]
    fn test_progress_through_word() {
        let engine = engine();
        let best = engine.best_path("ky", "きょう").unwrap();
        assert_eq!(best.committed, 0);
        assert_eq!(best.remaining, "ou");

        let best = engine.best_path("kyo", "きょう").unwrap();
        assert_eq!(best.committed, 2);
        assert_eq!(best.remaining, "u");

        let best = engine.best_path("kyou", "きょう").unwrap();
        assert_eq!(best.committed, 3);
        assert!(best.is_complete());
    }

    #[test]
    fn test_alternative_spelling_is_followed() {
        let engine = engine();
        // "shi" is longer than "si" but still valid.
        let best = engine.best_path("sh", "しか").unwrap();
        assert_eq!(best.remaining, "ika");
        let best = engine.best_path("c", "しか").unwrap();
        assert_eq!(best.remaining, "ika");
    }

    #[test]
    fn test_divergence_is_rejected() {
        let engine = engine();
        assert_eq!(engine.best_path("ka", "きょう"), None);
        assert_eq!(engine.best_path("kyq", "きょう"), None);
    }

    #[test]
    fn test_trailing_n() {
        let engine = engine();
        let best = engine.best_path("ka", "かん").unwrap();
        assert_eq!(best.remaining, "nn");

        // A bare n at the end is not committed until the next key decides it.
        let best = engine.best_path("kan", "かん").unwrap();
        assert_eq!(best.committed, 1);
        assert_eq!(best.remaining, "n");

        let best = engine.best_path("kan", "かんじ").unwrap();
        assert_eq!(best.remaining, "ji");

        let best = engine.best_path("kan", "かんな").unwrap();
        assert_eq!(best.remaining, "nna");
    }

    #[test]
    fn test_sokuon_push_back() {
        let engine = engine();
        let best = engine.best_path("gak", "がっこう").unwrap();
        assert_eq!(best.remaining, "kou");

        let best = engine.best_path("gakk", "がっこう").unwrap();
        assert_eq!(best.committed, 2);
        assert_eq!(best.remaining, "ou");
    }

    #[test]
    fn test_consumed_keys() {
        let engine = engine();
        assert_eq!(engine.best_path("", "かんじ").unwrap().consumed, 0);
        // The held n is typed but not yet behind any output.
        let best = engine.best_path("kan", "かんじ").unwrap();
        assert_eq!((best.committed, best.consumed), (1, 2));
        let best = engine.best_path("kanj", "かんじ").unwrap();
        assert_eq!((best.committed, best.consumed), (2, 3));
        // The pushed-back k of kk counts once.
        let best = engine.best_path("gakk", "がっこう").unwrap();
        assert_eq!((best.committed, best.consumed), (2, 3));
        let best = engine.best_path("shi", "し").unwrap();
        assert_eq!((best.committed, best.consumed), (1, 3));
    }

    #[test]
    fn test_complete_target_with_leftover_is_invalid() {
        let engine = engine();
        assert_eq!(engine.best_path("kak", "か"), None);
        let best = engine.best_path("ka", "か").unwrap();
        assert!(best.is_complete());
    }

    #[test]
    fn test_unmapped_target_char_fails() {
        let engine = engine();
        assert_eq!(engine.shortest_input("か漢"), None);
        assert_eq!(engine.best_path("", "か漢"), None);
        assert_eq!(engine.best_path("ka", "か漢"), None);
    }

    #[test]
    fn test_from_settings() {
        let engine = TypingEngine::from_settings(&Settings::default()).unwrap();
        assert_eq!(engine.convert("nihongo").output, "にほんご");
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypingEngine>();
    }
}
