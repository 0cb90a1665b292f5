//! Property-based tests for best-path queries over the built-in table.
//!
//! Targets are random sequences of kana units that the table can produce on
//! their own; typing the suggested input key by key must stay on a shortest
//! path the whole way. Random romaji strings cover the other direction: any
//! input that converts cleanly must be matched or beaten by the search, and
//! typing it key by key, whatever the spelling, must never lose committed
//! kana.

use std::sync::OnceLock;

use proptest::prelude::*;

use crate::engine::TypingEngine;
use crate::table::Flavor;

fn engine() -> &'static TypingEngine {
    static ENGINE: OnceLock<TypingEngine> = OnceLock::new();
    ENGINE.get_or_init(|| TypingEngine::builtin(Flavor::Any))
}

fn arb_unit() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        3 => prop::sample::select(vec!["あ", "う", "か", "き", "し", "な", "に", "ぱ"]),
        2 => Just("ん"),
        2 => Just("っ"),
        1 => prop::sample::select(vec!["きょ", "ちゃ", "ふぁ", "ヴ", "ー", "。"]),
    ]
}

fn arb_target() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_unit(), 1..6).prop_map(|units| units.concat())
}

/// Romaji built mostly from consonant-vowel syllables so that a fair share
/// converts without leftovers.
fn arb_romaji() -> impl Strategy<Value = String> {
    let vowel = prop::sample::select(vec!['a', 'i', 'u', 'e', 'o']);
    let consonant = prop::sample::select(vec![
        'k', 's', 't', 'n', 'h', 'y', 'x', 'c', 'l', 'w', 'j',
    ]);
    let any_key = prop::sample::select(vec![
        'a', 'i', 'u', 'e', 'o', 'k', 's', 't', 'n', 'h', 'y', 'x', 'c', 'l', 'w', 'j', '-',
        '.',
    ]);
    let syllable = prop_oneof![
        2 => vowel.clone().prop_map(String::from),
        4 => (consonant.clone(), vowel.clone()).prop_map(|(c, v)| String::from_iter([c, v])),
        2 => (consonant.clone(), consonant, vowel)
            .prop_map(|(c1, c2, v)| String::from_iter([c1, c2, v])),
        1 => any_key.prop_map(String::from),
    ];
    prop::collection::vec(syllable, 1..6).prop_map(|parts| parts.concat())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn shortest_input_converts_back(target in arb_target()) {
        let engine = engine();
        let input = engine.shortest_input(&target).unwrap();
        let converted = engine.convert(&input);
        prop_assert_eq!(&converted.output, &target);
        prop_assert!(converted.pending.is_empty(), "pending {:?}", converted.pending);
    }

    #[test]
    fn empty_input_query_is_stable(target in arb_target()) {
        let engine = engine();
        let first = engine.best_path("", &target);
        let second = engine.best_path("", &target);
        prop_assert_eq!(&first, &second);
        let first = first.unwrap();
        prop_assert_eq!(first.committed, 0);
        prop_assert_eq!(Some(first.remaining), engine.shortest_input(&target));
    }

    #[test]
    fn typing_the_suggestion_stays_optimal(target in arb_target()) {
        let engine = engine();
        let full = engine.shortest_input(&target).unwrap();
        let mut last_committed = 0;
        for k in 0..=full.len() {
            let typed = &full[..k];
            let best = engine.best_path(typed, &target);
            prop_assert!(best.is_some(), "typed {:?} fell off {:?}", typed, full);
            let best = best.unwrap();
            prop_assert!(best.committed >= last_committed);
            prop_assert_eq!(typed.len() + best.remaining.len(), full.len());
            last_committed = best.committed;
        }
        prop_assert_eq!(last_committed, target.chars().count());
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_global_rejects: 8192,
        ..ProptestConfig::default()
    })]

    #[test]
    fn typed_input_is_never_shorter_than_suggestion(input in arb_romaji()) {
        let engine = engine();
        let converted = engine.convert(&input);
        prop_assume!(converted.pending.is_empty());

        let shortest = engine.shortest_input(&converted.output);
        prop_assert!(shortest.is_some(), "{:?} gave untypeable {:?}", input, converted.output);
        let shortest = shortest.unwrap();
        prop_assert!(shortest.len() <= input.len(), "{:?} beat {:?}", input, shortest);
        let back = engine.convert(&shortest);
        prop_assert_eq!(&back.output, &converted.output);
        prop_assert!(back.pending.is_empty(), "pending {:?}", back.pending);
    }

    #[test]
    fn any_spelling_keeps_commitment_monotonic(input in arb_romaji()) {
        let engine = engine();
        let target = engine.convert(&input);
        prop_assume!(target.pending.is_empty());
        let target = target.output;

        let mut last_committed = 0;
        for k in 0..=input.len() {
            let typed = &input[..k];
            let best = engine.best_path(typed, &target);
            prop_assert!(best.is_some(), "typed {:?} fell off {:?}", typed, input);
            let best = best.unwrap();
            prop_assert!(best.committed >= last_committed, "typed {:?}", typed);
            prop_assert!(best.consumed <= k);
            prop_assert!(k + best.remaining.len() <= input.len(), "typed {:?}", typed);

            let finished = engine.convert(&format!("{typed}{}", best.remaining));
            prop_assert_eq!(&finished.output, &target);
            prop_assert!(finished.pending.is_empty());
            last_committed = best.committed;
        }
        prop_assert_eq!(last_committed, target.chars().count());
    }
}
