//! Kana-to-romaji index and shortest-input search.
//!
//! Derived from a [`ForwardRuleSet`]: rules are regrouped by the first
//! character of their output, and each group keeps a pruned short list for
//! the unconstrained part of the search.

mod search;


use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::charset::CharSet;
use crate::forward::ForwardRuleSet;
use crate::pool::Pool;
use crate::rule::ConversionRule;

use search::SearchScratch;

type RuleId = usize;

/// Interned `(leftover, prohibited)` pair a search state inherits from the
/// rule that produced it.
type CarryId = usize;

/// No leftover input and no lookahead restriction.
const NEUTRAL: CarryId = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Carry {
    leftover: String,
    prohibited: Option<CharSet>,
}

#[derive(Debug, Default)]
struct RuleGroup {
    /// Every rule whose output starts with the group's character, by order.
    rules: Vec<RuleId>,
    /// `rules` minus the ones an unrestricted rule does at least as cheaply.
    short: Vec<RuleId>,
}

pub struct InverseRuleSet {
    rules: Arc<[ConversionRule]>,
    groups: HashMap<char, RuleGroup>,
    carries: Vec<Carry>,
    carry_of: Vec<CarryId>,
    scratch: Pool<SearchScratch>,
}

impl InverseRuleSet {
    pub fn new(forward: &ForwardRuleSet) -> Self {
        let _span = debug_span!("inverse_build").entered();
        let rules = forward.shared_rules();

        let mut groups: HashMap<char, RuleGroup> = HashMap::new();
        for (id, rule) in rules.iter().enumerate() {
            groups
                .entry(rule.first_output_char())
                .or_default()
                .rules
                .push(id);
        }
        let mut pruned = 0usize;
        for group in groups.values_mut() {
            group.short = short_list(&rules, &group.rules);
            pruned += group.rules.len() - group.short.len();
        }

        let mut carries = vec![Carry {
            leftover: String::new(),
            prohibited: None,
        }];
        let mut carry_of = Vec::with_capacity(rules.len());
        {
            let mut interned: HashMap<(&str, Option<&CharSet>), CarryId> = HashMap::new();
            interned.insert(("", None), NEUTRAL);
            for rule in rules.iter() {
                let key = (rule.push_back(), rule.next_prohibited());
                let id = *interned.entry(key).or_insert_with(|| {
                    carries.push(Carry {
                        leftover: rule.push_back().to_string(),
                        prohibited: rule.next_prohibited().cloned(),
                    });
                    carries.len() - 1
                });
                carry_of.push(id);
            }
        }

        debug!(
            groups = groups.len(),
            pruned,
            carries = carries.len(),
            "inverse index built"
        );
        Self {
            rules,
            groups,
            carries,
            carry_of,
            scratch: Pool::new(SearchScratch::clear),
        }
    }

    /// Rules whose output starts with `head`, in table order.
    pub fn rules_producing(&self, head: char) -> impl Iterator<Item = &ConversionRule> + '_ {
        self.group_ids(head, |group| &group.rules)
    }

    /// The pruned candidates used once no partial input constrains the search.
    pub fn short_list(&self, head: char) -> impl Iterator<Item = &ConversionRule> + '_ {
        self.group_ids(head, |group| &group.short)
    }

    fn group_ids<'a>(
        &'a self,
        head: char,
        pick: fn(&RuleGroup) -> &Vec<RuleId>,
    ) -> impl Iterator<Item = &'a ConversionRule> + 'a {
        self.groups
            .get(&head)
            .map(pick)
            .into_iter()
            .flatten()
            .map(|&id| &self.rules[id])
    }
}

/// `b` makes `a` redundant when nothing constrains the next keystrokes: same
/// output and push-back, no lookahead restriction, and no more keys to type.
fn dominates(b: &ConversionRule, a: &ConversionRule) -> bool {
    if b.is_restricted() || b.to() != a.to() || b.push_back() != a.push_back() {
        return false;
    }
    let (b_len, a_len) = (b.from().chars().count(), a.from().chars().count());
    b_len < a_len || (b_len == a_len && b.order() < a.order())
}

fn short_list(rules: &[ConversionRule], group: &[RuleId]) -> Vec<RuleId> {
    group
        .iter()
        .copied()
        .filter(|&a| {
            !group
                .iter()
                .any(|&b| b != a && dominates(&rules[b], &rules[a]))
        })
        .collect()
}
