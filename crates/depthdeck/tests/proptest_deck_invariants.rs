//! Property-based invariant tests for the deck controller.
//!
//! 1. Anchors round-trip: parse(encode(i)) == i for every slide.
//! 2. Clamping always lands inside the deck and fixes in-range indices.
//! 3. Any navigation sequence leaves exactly one active slide once settled.
//! 4. Toggling overview twice restores state and markers.
//! 5. Anchor writes only happen when the fragment changes.

use depthdeck::deck::hash::{History, encode_fragment, parse_fragment};
use depthdeck::deck::state::clamp_index;
use depthdeck::deck::{Deck, DeckOptions};
use depthdeck::parser;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn deck(count: usize) -> Deck {
    let source: Vec<String> = (1..=count).map(|i| format!("# Slide {i}")).collect();
    let slides = parser::parse(&source.join("\n\n---\n\n")).slides;
    Deck::new(slides, DeckOptions::default(), History::default()).unwrap()
}

fn settle(deck: &mut Deck) {
    for ticket in deck.take_tickets() {
        deck.complete_transition(ticket);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Anchor round-trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fragment_round_trip(count in 1usize..500, pick in any::<prop::sample::Index>()) {
        let index = pick.index(count);
        prop_assert_eq!(parse_fragment(&encode_fragment(index), count), index);
    }

    #[test]
    fn parse_never_leaves_deck(count in 1usize..100, fragment in ".*") {
        prop_assert!(parse_fragment(&fragment, count) < count);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Clamp law
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clamp_stays_in_range(count in 1usize..1000, requested in any::<isize>()) {
        let clamped = clamp_index(requested, count);
        prop_assert!(clamped < count);
        if requested >= 0 && (requested as usize) < count {
            prop_assert_eq!(clamped, requested as usize);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. One active slide after settling
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn settled_deck_shows_one_slide(
        count in 1usize..12,
        steps in prop::collection::vec(-15isize..15, 0..20),
    ) {
        let mut deck = deck(count);
        for step in &steps {
            deck.go_to(*step);
        }
        settle(&mut deck);

        let active: Vec<usize> = deck
            .animator()
            .markers()
            .iter()
            .enumerate()
            .filter(|(_, m)| m.active)
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(active, vec![deck.current_index()]);
        prop_assert!(deck.animator().markers().iter().all(|m| !m.is_animating()));
        prop_assert_eq!(deck.fragment(), encode_fragment(deck.current_index()));
    }

    #[test]
    fn overlapping_transitions_settle_in_any_order(
        count in 2usize..10,
        targets in prop::collection::vec(0isize..10, 1..8),
        reverse in any::<bool>(),
    ) {
        let mut deck = deck(count);
        let mut held = Vec::new();
        for target in &targets {
            deck.go_to(*target);
            held.extend(deck.take_tickets());
        }
        if reverse {
            held.reverse();
        }
        for ticket in held {
            deck.complete_transition(ticket);
        }
        let active = deck.animator().markers().iter().filter(|m| m.active).count();
        prop_assert_eq!(active, 1);
        prop_assert!(deck.animator().markers()[deck.current_index()].active);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Overview toggle is an involution
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn double_overview_toggle_restores(count in 1usize..12, start in 0isize..12) {
        let mut deck = deck(count);
        deck.go_to(start);
        settle(&mut deck);
        let state = deck.state();
        let markers = deck.animator().markers().to_vec();

        deck.toggle_overview();
        deck.toggle_overview();

        prop_assert_eq!(deck.state(), state);
        prop_assert_eq!(deck.animator().markers(), markers.as_slice());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Idempotent anchor writes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn history_grows_only_on_change(
        count in 1usize..8,
        steps in prop::collection::vec(-3isize..3, 0..30),
    ) {
        let mut deck = deck(count);
        let mut expected = deck.location().len();
        for step in steps {
            let before = deck.current_index();
            deck.step_by(step);
            if deck.current_index() != before {
                expected += 1;
            }
            settle(&mut deck);
        }
        prop_assert_eq!(deck.location().len(), expected);
    }
}
