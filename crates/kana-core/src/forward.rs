//! Romaji-to-kana tokenizer.
//!
//! Rules are bucketed by their first input character. Every rule that is a
//! proper prefix of a longer rule in its bucket gets a prohibited-next-char
//! set, which gives maximal munch with a single character of lookahead.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::charset::CharSet;
use crate::rule::{ConversionRule, RuleElement, RuleError};

/// Input consumed from the front, with push-back support.
#[derive(Debug, Clone, Default)]
pub struct InputStream {
    buf: String,
    head: usize,
}

impl InputStream {
    pub fn new(input: &str) -> Self {
        Self {
            buf: input.to_string(),
            head: 0,
        }
    }

    pub fn reset(&mut self, input: &str) {
        self.buf.clear();
        self.buf.push_str(input);
        self.head = 0;
    }

    pub fn as_str(&self) -> &str {
        &self.buf[self.head..]
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.buf.len()
    }

    /// Drop `len` bytes from the front. Panics past the end or off a char boundary.
    pub fn pop(&mut self, len: usize) {
        assert!(
            self.as_str().is_char_boundary(len),
            "pop({len}) out of range for {:?}",
            self.as_str()
        );
        self.head += len;
    }

    /// Put `s` back in front of the remaining input.
    pub fn push_front(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        if let Some(start) = self.head.checked_sub(s.len()) {
            if self.buf.is_char_boundary(start) {
                // Reuse consumed space; the replaced range has the same byte length.
                self.buf.replace_range(start..self.head, s);
                self.head = start;
                return;
            }
        }
        self.buf.replace_range(..self.head, s);
        self.head = 0;
    }

    pub fn into_string(mut self) -> String {
        self.buf.drain(..self.head);
        self.buf
    }
}

/// Result of a one-shot forward conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    /// Committed output.
    pub output: String,
    /// Input that no rule could consume yet.
    pub pending: String,
}

impl Converted {
    pub fn unconsumed_len(&self) -> usize {
        self.pending.chars().count()
    }
}

pub struct ForwardRuleSet {
    rules: Arc<[ConversionRule]>,
    index: HashMap<char, Vec<usize>>,
}

impl ForwardRuleSet {
    pub fn new<I>(elements: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = RuleElement>,
    {
        let _span = debug_span!("forward_build").entered();
        let rules = elements
            .into_iter()
            .enumerate()
            .map(|(order, element)| ConversionRule::new(element, order))
            .collect::<Result<Vec<_>, _>>()?;
        if rules.is_empty() {
            return Err(RuleError::EmptyTable);
        }

        let mut index: HashMap<char, Vec<usize>> = HashMap::new();
        for (i, rule) in rules.iter().enumerate() {
            index.entry(rule.first_input_char()).or_default().push(i);
        }

        let mut restricted = 0usize;
        for bucket in index.values() {
            for &i in bucket {
                let rule = &rules[i];
                let prefix = rule.from();
                let prohibited: CharSet = bucket
                    .iter()
                    .map(|&j| rules[j].from())
                    .filter(|other| other.len() > prefix.len() && other.starts_with(prefix))
                    .filter_map(|other| other[prefix.len()..].chars().next())
                    .collect();
                if !prohibited.is_empty() {
                    rule.set_next_prohibited(prohibited);
                    restricted += 1;
                }
            }
        }

        debug!(rules = rules.len(), buckets = index.len(), restricted);
        Ok(Self {
            rules: rules.into(),
            index,
        })
    }

    pub fn rules(&self) -> &[ConversionRule] {
        &self.rules
    }

    pub(crate) fn shared_rules(&self) -> Arc<[ConversionRule]> {
        Arc::clone(&self.rules)
    }

    /// Rules starting with `first`, in table order.
    pub fn bucket(&self, first: char) -> impl Iterator<Item = &ConversionRule> + '_ {
        self.index
            .get(&first)
            .into_iter()
            .flatten()
            .map(|&i| &self.rules[i])
    }

    /// The rule to fire at the front of `input`, if it can be decided yet.
    pub fn find_rule(&self, input: &str) -> Option<&ConversionRule> {
        let first = input.chars().next()?;
        let bucket = self.index.get(&first)?;

        // A restricted match may still lose to a longer rule later in the
        // bucket; the first unrestricted match ends the scan.
        let mut best = None;
        for &i in bucket {
            let rule = &self.rules[i];
            if !input.starts_with(rule.from()) {
                continue;
            }
            best = Some(rule);
            if !rule.is_restricted() {
                break;
            }
        }

        let rule = best?;
        match rule.next_prohibited() {
            None => Some(rule),
            Some(prohibited) => match input[rule.from().len()..].chars().next() {
                Some(next) if !prohibited.contains(next) => Some(rule),
                // No lookahead yet: the input may still grow into a longer rule.
                _ => None,
            },
        }
    }

    /// Convert as much of `stream` as possible, appending to `output`.
    ///
    /// Whatever cannot be converted stays in `stream`. Fired rules are
    /// appended to `trail` when given.
    pub fn convert_into<'s>(
        &'s self,
        stream: &mut InputStream,
        output: &mut String,
        mut trail: Option<&mut Vec<&'s ConversionRule>>,
    ) {
        while let Some(rule) = self.find_rule(stream.as_str()) {
            output.push_str(rule.to());
            stream.pop(rule.from().len());
            stream.push_front(rule.push_back());
            if let Some(trail) = trail.as_deref_mut() {
                trail.push(rule);
            }
        }
    }

    pub fn convert(&self, input: &str) -> Converted {
        let mut stream = InputStream::new(input);
        let mut output = String::new();
        self.convert_into(&mut stream, &mut output, None);
        Converted {
            output,
            pending: stream.into_string(),
        }
    }

    /// Like [`convert_into`](Self::convert_into) but every emitted unit must
    /// continue `target`. Returns the part of `target` not yet matched.
    pub fn convert_as_possible<'s, 't>(
        &'s self,
        stream: &mut InputStream,
        mut target: &'t str,
        mut trail: Option<&mut Vec<&'s ConversionRule>>,
    ) -> &'t str {
        while let Some(rule) = self.find_rule(stream.as_str()) {
            let Some(rest) = target.strip_prefix(rule.to()) else {
                break;
            };
            target = rest;
            stream.pop(rule.from().len());
            stream.push_front(rule.push_back());
            if let Some(trail) = trail.as_deref_mut() {
                trail.push(rule);
            }
        }
        target
    }

    /// Number of typed characters behind the first `converted_len` output
    /// characters of a conversion that fired `trail`.
    pub fn typed_len_for(&self, converted_len: usize, trail: &[&ConversionRule]) -> usize {
        let mut remaining = converted_len;
        let mut typed = 0;
        for rule in trail {
            if remaining == 0 {
                break;
            }
            remaining = remaining.saturating_sub(rule.to().chars().count());
            typed += rule
                .from()
                .chars()
                .count()
                .saturating_sub(rule.push_back().chars().count());
        }
        typed
    }

    /// Whether typing can continue from `input`: some rule either fires on it
    /// or still extends it.
    pub fn has_successor(&self, input: &str) -> bool {
        let Some(first) = input.chars().next() else {
            return false;
        };
        self.bucket(first)
            .any(|rule| rule.from().starts_with(input) || input.starts_with(rule.from()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(table: &[(&str, &str, &str)]) -> ForwardRuleSet {
        ForwardRuleSet::new(
            table
                .iter()
                .map(|&(from, to, push)| RuleElement::with_push_back(from, to, push)),
        )
        .unwrap()
    }

    fn small_table() -> ForwardRuleSet {
        rules(&[
            ("n", "ん", ""),
            ("a", "あ", ""),
            ("i", "い", ""),
            ("ka", "か", ""),
            ("na", "な", ""),
            ("ni", "に", ""),
            ("nya", "にゃ", ""),
            ("nn", "ん", ""),
            ("ta", "た", ""),
            ("tt", "っ", "t"),
            ("kk", "っ", "k"),
        ])
    }

    #[test]
    fn test_stream_pop_and_push() {
        let mut stream = InputStream::new("ttai");
        stream.pop(2);
        assert_eq!(stream.as_str(), "ai");
        stream.push_front("t");
        assert_eq!(stream.as_str(), "tai");
        stream.pop(3);
        assert!(stream.is_empty());
        stream.push_front("xyz");
        assert_eq!(stream.as_str(), "xyz");
        assert_eq!(stream.into_string(), "xyz");
    }

    #[test]
    fn test_stream_push_longer_than_consumed() {
        let mut stream = InputStream::new("ab");
        stream.pop(1);
        stream.push_front("xyz");
        assert_eq!(stream.as_str(), "xyzb");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_stream_pop_past_end_panics() {
        let mut stream = InputStream::new("a");
        stream.pop(2);
    }

    #[test]
    fn test_prohibited_sets() {
        let set = small_table();
        let n = set.find_rule("nk").unwrap();
        let prohibited: String = n.next_prohibited().unwrap().iter().collect();
        assert_eq!(prohibited, "ainy");
        assert!(!set.rules()[3].is_restricted(), "ka has no longer rule");
    }

    #[test]
    fn test_disambiguation_prefers_longer_rule() {
        let set = rules(&[("k", "K", ""), ("ka", "KA", "")]);
        assert_eq!(set.convert("ka").output, "KA");
        assert_eq!(set.convert("kk").output, "K");
        // Undecided until the next key arrives.
        let pending = set.convert("k");
        assert_eq!(pending.output, "");
        assert_eq!(pending.pending, "k");
    }

    #[test]
    fn test_n_before_consonant() {
        let set = small_table();
        assert_eq!(set.convert("nka").output, "んか");
        // nn is the first unrestricted match, so it takes both n's.
        assert_eq!(set.convert("nna").output, "んあ");
        assert_eq!(set.convert("nnna").output, "んな");
        assert_eq!(set.convert("nya").output, "にゃ");
        let held = set.convert("kan");
        assert_eq!(held.output, "か");
        assert_eq!(held.pending, "n");
        assert_eq!(held.unconsumed_len(), 1);
    }

    #[test]
    fn test_push_back_reenters_stream() {
        let set = small_table();
        assert_eq!(set.convert("tta").output, "った");
        assert_eq!(set.convert("ttta").output, "っった");
        let partial = set.convert("tt");
        assert_eq!(partial.output, "っ");
        assert_eq!(partial.pending, "t");
    }

    #[test]
    fn test_stops_at_unconvertible_input() {
        let set = small_table();
        let result = set.convert("kaqa");
        assert_eq!(result.output, "か");
        assert_eq!(result.pending, "qa");
    }

    #[test]
    fn test_convert_as_possible() {
        let set = small_table();
        let mut stream = InputStream::new("kanika");
        let rest = set.convert_as_possible(&mut stream, "かなか", None);
        assert_eq!(rest, "なか");
        assert_eq!(stream.as_str(), "nika");

        let mut stream = InputStream::new("kka");
        let mut trail = Vec::new();
        let rest = set.convert_as_possible(&mut stream, "っか", Some(&mut trail));
        assert_eq!(rest, "");
        assert!(stream.is_empty());
        assert_eq!(trail.len(), 2);
    }

    #[test]
    fn test_typed_len_for() {
        let set = small_table();
        let mut stream = InputStream::new("ttanka");
        let mut output = String::new();
        let mut trail = Vec::new();
        set.convert_into(&mut stream, &mut output, Some(&mut trail));
        assert_eq!(output, "ったんか");
        assert_eq!(set.typed_len_for(0, &trail), 0);
        assert_eq!(set.typed_len_for(1, &trail), 1);
        assert_eq!(set.typed_len_for(2, &trail), 3);
        assert_eq!(set.typed_len_for(3, &trail), 4);
        assert_eq!(set.typed_len_for(4, &trail), 6);
    }

    #[test]
    fn test_has_successor() {
        let set = small_table();
        assert!(set.has_successor("n"));
        assert!(set.has_successor("ny"));
        assert!(set.has_successor("ka"));
        assert!(!set.has_successor("q"));
        assert!(!set.has_successor("kx"));
        assert!(!set.has_successor(""));
    }

    #[test]
    fn test_empty_table_rejected() {
        let err = ForwardRuleSet::new(Vec::new()).err().unwrap();
        assert_eq!(err, RuleError::EmptyTable);
    }
}
