use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::rule::{RuleElement, RuleError};

/// IME dialect a rule belongs to. Untagged rules belong to every flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    /// Accept rules of every dialect.
    #[default]
    Any,
    Microsoft,
    Google,
}

impl Flavor {
    /// Whether a rule tagged `tag` is loaded under this flavor.
    pub fn accepts(self, tag: Option<Flavor>) -> bool {
        match (self, tag) {
            (_, None) | (Flavor::Any, _) | (_, Some(Flavor::Any)) => true,
            (wanted, Some(tag)) => wanted == tag,
        }
    }
}

impl FromStr for Flavor {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" => Ok(Flavor::Any),
            "microsoft" | "ms" => Ok(Flavor::Microsoft),
            "google" => Ok(Flavor::Google),
            _ => Err(TableError::UnknownFlavor(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("line {line}: {reason}")]
    InvalidLine { line: usize, reason: String },
    #[error("unknown flavor: {0}")]
    UnknownFlavor(String),
    #[error("no rules left for flavor {0:?}")]
    Empty(Flavor),
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Deserialize)]
struct RuleTable {
    rules: Vec<TableEntry>,
}

#[derive(Deserialize)]
struct TableEntry {
    from: String,
    to: String,
    #[serde(default)]
    push_back: String,
    #[serde(default)]
    flavor: Option<Flavor>,
}

/// Parse a TOML table (`rules = [{ from, to, push_back?, flavor? }, ...]`),
/// keeping the rules `flavor` accepts, in file order.
pub fn parse_rules_toml(toml_str: &str, flavor: Flavor) -> Result<Vec<RuleElement>, TableError> {
    let table: RuleTable =
        toml::from_str(toml_str).map_err(|e| TableError::Parse(e.to_string()))?;

    let mut rules = Vec::with_capacity(table.rules.len());
    for (index, entry) in table.rules.into_iter().enumerate() {
        check_fields(index, &entry.from, &entry.to)?;
        if flavor.accepts(entry.flavor) {
            rules.push(RuleElement::with_push_back(entry.from, entry.to, entry.push_back));
        }
    }
    if rules.is_empty() {
        return Err(TableError::Empty(flavor));
    }
    Ok(rules)
}

/// Parse a tab-separated table: `from<TAB>to[<TAB>push_back]` per line.
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_rules_tsv(text: &str) -> Result<Vec<RuleElement>, TableError> {
    let mut rules = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split('\t');
        let (Some(from), Some(to)) = (fields.next(), fields.next()) else {
            return Err(TableError::InvalidLine {
                line: i + 1,
                reason: "expected `from<TAB>to[<TAB>push_back]`".to_string(),
            });
        };
        let push_back = fields.next().unwrap_or("");
        if fields.next().is_some() {
            return Err(TableError::InvalidLine {
                line: i + 1,
                reason: "too many columns".to_string(),
            });
        }
        if from.is_empty() || to.is_empty() {
            return Err(TableError::InvalidLine {
                line: i + 1,
                reason: "empty `from` or `to`".to_string(),
            });
        }
        rules.push(RuleElement::with_push_back(from, to, push_back));
    }
    if rules.is_empty() {
        return Err(TableError::Empty(Flavor::Any));
    }
    Ok(rules)
}

/// Load a table file; `.tsv`/`.txt` are tab-separated, anything else is TOML.
/// TSV tables carry no flavor tags.
pub fn load_rules(path: &Path, flavor: Flavor) -> Result<Vec<RuleElement>, TableError> {
    let text = std::fs::read_to_string(path).map_err(|source| TableError::Io {
        path: path.display().to_string(),
        source,
    })?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("tsv" | "txt") => parse_rules_tsv(&text),
        _ => parse_rules_toml(&text, flavor),
    }
}

fn check_fields(index: usize, from: &str, to: &str) -> Result<(), RuleError> {
    if from.is_empty() {
        return Err(RuleError::EmptyFrom { index });
    }
    if to.is_empty() {
        return Err(RuleError::EmptyTo {
            index,
            from: from.to_string(),
        });
    }
    Ok(())
}
