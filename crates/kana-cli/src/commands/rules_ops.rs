use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use kana_engine::{ConversionRule, TypingEngine};

#[derive(Debug, Serialize)]
pub struct RuleRow {
    pub order: usize,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub push_back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prohibited: Option<String>,
}

impl From<&ConversionRule> for RuleRow {
    fn from(rule: &ConversionRule) -> Self {
        Self {
            order: rule.order(),
            from: rule.from().to_string(),
            to: rule.to().to_string(),
            push_back: rule.push_back().to_string(),
            prohibited: rule.next_prohibited().map(|set| set.iter().collect()),
        }
    }
}

/// Rules in table order. `producing` keeps the rules whose output starts
/// with that character; `restricted` keeps the ones with a lookahead set.
pub fn list(engine: &TypingEngine, producing: Option<char>, restricted: bool) -> Vec<RuleRow> {
    let rules: Vec<&ConversionRule> = match producing {
        Some(head) => engine.inverse().rules_producing(head).collect(),
        None => engine.forward().rules().iter().collect(),
    };
    rules
        .into_iter()
        .filter(|rule| !restricted || rule.is_restricted())
        .map(RuleRow::from)
        .collect()
}

fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{s}{}", " ".repeat(width.saturating_sub(w)))
}

/// Aligned text table; kana are double width.
pub fn format_table(rows: &[RuleRow]) -> String {
    let from_w = rows.iter().map(|r| r.from.width()).max().unwrap_or(0).max(4);
    let to_w = rows.iter().map(|r| r.to.width()).max().unwrap_or(0).max(2);
    let push_w = rows.iter().map(|r| r.push_back.width()).max().unwrap_or(0).max(4);

    let mut out = format!(
        "{:>5}  {}  {}  {}  next-prohibited\n",
        "#",
        pad("from", from_w),
        pad("to", to_w),
        pad("push", push_w)
    );
    for row in rows {
        let line = format!(
            "{:>5}  {}  {}  {}  {}",
            row.order,
            pad(&row.from, from_w),
            pad(&row.to, to_w),
            pad(&row.push_back, push_w),
            row.prohibited.as_deref().unwrap_or("")
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
