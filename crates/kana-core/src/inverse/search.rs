use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, debug_span};

use super::{CarryId, InverseRuleSet, RuleId, NEUTRAL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SearchState {
    /// Byte offset into the target already produced.
    pos: usize,
    carry: CarryId,
    /// Bytes of the partial input matched so far, capped at its length.
    matched: usize,
}

const START: SearchState = SearchState {
    pos: 0,
    carry: NEUTRAL,
    matched: 0,
};

#[derive(Debug, Clone, Copy)]
struct Node {
    state: SearchState,
    /// Keystrokes from the start state.
    cost: usize,
    parent: Option<usize>,
    via: Option<RuleId>,
}

/// Per-call search memory, leased from the rule set's pool.
#[derive(Debug, Default)]
pub(super) struct SearchScratch {
    nodes: Vec<Node>,
    seen: HashMap<SearchState, usize>,
    /// `(cost, push sequence, node)`; the sequence keeps equal costs FIFO.
    frontier: BinaryHeap<Reverse<(usize, usize, usize)>>,
}

impl SearchScratch {
    pub(super) fn clear(&mut self) {
        self.nodes.clear();
        self.seen.clear();
        self.frontier.clear();
    }
}

impl InverseRuleSet {
    /// Shortest input that converts to exactly `target` and starts with
    /// `partial`, or `None` if no such input exists.
    ///
    /// The returned string includes `partial` itself.
    pub fn find_shortest_input(&self, partial: &str, target: &str) -> Option<String> {
        let _span = debug_span!(
            "find_shortest_input",
            partial_len = partial.len(),
            target_len = target.len()
        )
        .entered();

        let mut scratch = self.scratch.lease();
        let SearchScratch {
            nodes,
            seen,
            frontier,
        } = &mut *scratch;

        nodes.push(Node {
            state: START,
            cost: 0,
            parent: None,
            via: None,
        });
        seen.insert(START, 0);
        frontier.push(Reverse((0, 0, 0)));
        let mut seq = 1usize;
        let mut explored = 0usize;

        while let Some(Reverse((cost, _, idx))) = frontier.pop() {
            let node = nodes[idx];
            if cost > node.cost {
                continue; // superseded by a cheaper entry
            }
            explored += 1;

            let SearchState {
                pos,
                carry,
                matched,
            } = node.state;
            if pos == target.len() && carry == NEUTRAL && matched == partial.len() {
                let input = self.reconstruct(nodes, idx);
                debug!(explored, cost, "shortest input found");
                return Some(input);
            }

            let rest = &target[pos..];
            let Some(head) = rest.chars().next() else {
                continue;
            };
            let Some(group) = self.groups.get(&head) else {
                continue;
            };

            let constrained = matched < partial.len();
            let candidates = if constrained || carry != NEUTRAL {
                &group.rules
            } else {
                &group.short
            };
            let pending = &self.carries[carry];

            for &id in candidates {
                let rule = &self.rules[id];
                if pending
                    .prohibited
                    .as_ref()
                    .is_some_and(|p| p.contains(rule.first_input_char()))
                {
                    continue;
                }
                if !rest.starts_with(rule.to()) {
                    continue;
                }
                let Some(segment) = rule.from().strip_prefix(pending.leftover.as_str()) else {
                    continue;
                };
                let mut next_matched = matched;
                if constrained {
                    let remain = &partial[matched..];
                    if !(remain.starts_with(segment) || segment.starts_with(remain)) {
                        continue;
                    }
                    next_matched = (matched + segment.len()).min(partial.len());
                }

                let next = Node {
                    state: SearchState {
                        pos: pos + rule.to().len(),
                        carry: self.carry_of[id],
                        matched: next_matched,
                    },
                    cost: cost + segment.chars().count(),
                    parent: Some(idx),
                    via: Some(id),
                };
                let slot = match seen.get(&next.state) {
                    Some(&j) if nodes[j].cost <= next.cost => continue,
                    Some(&j) => {
                        nodes[j] = next;
                        j
                    }
                    None => {
                        nodes.push(next);
                        seen.insert(next.state, nodes.len() - 1);
                        nodes.len() - 1
                    }
                };
                frontier.push(Reverse((next.cost, seq, slot)));
                seq += 1;
            }
        }

        debug!(explored, "target unreachable");
        None
    }

    /// Walk parent links back to the start and join the typed segments in
    /// forward order.
    fn reconstruct(&self, nodes: &[Node], mut idx: usize) -> String {
        let mut segments = Vec::new();
        while let (Some(parent), Some(id)) = (nodes[idx].parent, nodes[idx].via) {
            let leftover = &self.carries[nodes[parent].state.carry].leftover;
            segments.push(&self.rules[id].from()[leftover.len()..]);
            idx = parent;
        }
        segments.iter().rev().copied().collect()
    }
}
