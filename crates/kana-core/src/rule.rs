use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::charset::CharSet;

/// One row of a rule table: typing `from` produces `to`, then `push_back`
/// is put back in front of the remaining input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleElement {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub push_back: String,
}

impl RuleElement {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            push_back: String::new(),
        }
    }

    pub fn with_push_back(
        from: impl Into<String>,
        to: impl Into<String>,
        push_back: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            push_back: push_back.into(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule #{index}: `from` is empty")]
    EmptyFrom { index: usize },
    #[error("rule #{index} ({from}): `to` is empty")]
    EmptyTo { index: usize, from: String },
    #[error("rule table is empty")]
    EmptyTable,
}

/// A rule as indexed by the rule sets.
#[derive(Debug)]
pub struct ConversionRule {
    from: String,
    to: String,
    push_back: String,
    order: usize,
    next_prohibited: OnceLock<CharSet>,
}

impl ConversionRule {
    pub(crate) fn new(element: RuleElement, order: usize) -> Result<Self, RuleError> {
        let RuleElement { from, to, push_back } = element;
        if from.is_empty() {
            return Err(RuleError::EmptyFrom { index: order });
        }
        if to.is_empty() {
            return Err(RuleError::EmptyTo { index: order, from });
        }
        Ok(Self {
            from,
            to,
            push_back,
            order,
            next_prohibited: OnceLock::new(),
        })
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn push_back(&self) -> &str {
        &self.push_back
    }

    /// Position in the source table. Lower wins ties.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Characters that must not directly follow `from` for this rule to fire.
    /// `None` means the rule is unrestricted.
    pub fn next_prohibited(&self) -> Option<&CharSet> {
        self.next_prohibited.get()
    }

    pub fn is_restricted(&self) -> bool {
        self.next_prohibited.get().is_some()
    }

    pub(crate) fn first_input_char(&self) -> char {
        // `from` is non-empty by construction.
        self.from.chars().next().unwrap_or_default()
    }

    pub(crate) fn first_output_char(&self) -> char {
        self.to.chars().next().unwrap_or_default()
    }

    /// Panics on a second assignment: the set is derived once while the
    /// forward index is built.
    pub(crate) fn set_next_prohibited(&self, chars: CharSet) {
        assert!(
            self.next_prohibited.set(chars).is_ok(),
            "next_prohibited already set for rule {self}"
        );
    }

    pub fn element(&self) -> RuleElement {
        RuleElement::with_push_back(&*self.from, &*self.to, &*self.push_back)
    }
}

impl fmt::Display for ConversionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)?;
        if !self.push_back.is_empty() {
            write!(f, " + {}", self.push_back)?;
        }
        Ok(())
    }
}
