//! Rule tables: the embedded default and loaders for user tables.

mod config;

pub use config::{load_rules, parse_rules_toml, parse_rules_tsv, Flavor, TableError};

use crate::rule::RuleElement;

pub const DEFAULT_RULES_TOML: &str = include_str!("default_rules.toml");

/// The embedded table filtered for `flavor`.
pub fn builtin_rules(flavor: Flavor) -> Vec<RuleElement> {
    // Validated by build.rs; every flavor keeps the untagged rules.
    parse_rules_toml(DEFAULT_RULES_TOML, flavor).expect("default romaji table must be valid")
}
