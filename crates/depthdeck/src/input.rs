//! Maps raw keyboard, pointer and anchor events onto deck operations.
//!
//! The router knows nothing about egui; the app translates its events into
//! [`DeckInput`] first, which keeps the mapping testable without a window.

use crate::deck::Deck;
use crate::deck::hash::Location;
use crate::deck::parallax::PointerBox;

/// Horizontal travel, in pixels, a press/release pair needs to count as a swipe.
pub const SWIPE_THRESHOLD: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckKey {
    Next,
    Previous,
    First,
    Last,
    ToggleOverview,
    ToggleNotes,
    Escape,
    /// 0-based position in the preset table.
    Preset(usize),
    HistoryBack,
    HistoryForward,
}

/// Look up a key by its DOM-style name (`"ArrowRight"`, `" "`, `"o"`).
pub fn key_from_name(name: &str, alt: bool) -> Option<DeckKey> {
    let key = match name {
        "ArrowLeft" if alt => DeckKey::HistoryBack,
        "ArrowRight" if alt => DeckKey::HistoryForward,
        "ArrowRight" | "PageDown" | " " | "Space" => DeckKey::Next,
        "ArrowLeft" | "PageUp" => DeckKey::Previous,
        "Home" => DeckKey::First,
        "End" => DeckKey::Last,
        "o" | "O" => DeckKey::ToggleOverview,
        "n" | "N" => DeckKey::ToggleNotes,
        "Escape" => DeckKey::Escape,
        "1" => DeckKey::Preset(0),
        "2" => DeckKey::Preset(1),
        "3" => DeckKey::Preset(2),
        _ => return None,
    };
    Some(key)
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeckInput {
    Key(DeckKey),
    PointerMoved { x: f32, y: f32, bounds: PointerBox },
    PointerPressed { x: f32 },
    PointerReleased { x: f32 },
    DotClicked(usize),
    /// A slide cell in the overview grid.
    CellClicked(usize),
    PrevClicked,
    NextClicked,
    FragmentChanged(String),
}

/// Press/release pair tracking for horizontal swipes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwipeTracker {
    start_x: Option<f32>,
}

impl SwipeTracker {
    pub fn press(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    /// Finish a gesture. Returns the step it asks for: `1` for a leftward
    /// swipe, `-1` for a rightward one.
    pub fn release(&mut self, x: f32) -> Option<isize> {
        let dx = x - self.start_x.take()?;
        if dx.abs() <= SWIPE_THRESHOLD {
            return None;
        }
        Some(if dx < 0.0 { 1 } else { -1 })
    }

    pub fn cancel(&mut self) {
        self.start_x = None;
    }
}

#[derive(Debug, Default)]
pub struct InputRouter {
    swipe: SwipeTracker,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one input to `deck`. Returns `false` when the input was not
    /// meant for the deck (e.g. `Escape` with the notes panel closed).
    pub fn handle<L: Location>(&mut self, deck: &mut Deck<L>, input: DeckInput) -> bool {
        match input {
            DeckInput::Key(key) => return handle_key(deck, key),
            DeckInput::PointerMoved { x, y, bounds } => deck.pointer_moved(x, y, bounds),
            DeckInput::PointerPressed { x } => {
                if deck.state().overview {
                    self.swipe.cancel();
                    return false;
                }
                self.swipe.press(x);
            }
            DeckInput::PointerReleased { x } => {
                if deck.state().overview {
                    self.swipe.cancel();
                    return false;
                }
                match self.swipe.release(x) {
                    Some(step) => {
                        tracing::debug!(step, "swipe");
                        deck.step_by(step);
                    }
                    None => return false,
                }
            }
            DeckInput::DotClicked(index) => deck.go_to(index as isize),
            DeckInput::CellClicked(index) => {
                deck.go_to(index as isize);
                if deck.state().overview {
                    deck.toggle_overview();
                }
            }
            DeckInput::PrevClicked => deck.step_by(-1),
            DeckInput::NextClicked => deck.step_by(1),
            DeckInput::FragmentChanged(fragment) => deck.on_fragment_change(&fragment),
        }
        true
    }
}

fn handle_key<L: Location>(deck: &mut Deck<L>, key: DeckKey) -> bool {
    match key {
        DeckKey::Next => deck.step_by(1),
        DeckKey::Previous => deck.step_by(-1),
        DeckKey::First => deck.go_to(0),
        DeckKey::Last => deck.go_to(deck.slide_count() as isize - 1),
        DeckKey::ToggleOverview => deck.toggle_overview(),
        DeckKey::ToggleNotes => deck.toggle_notes(),
        DeckKey::Escape => {
            if !deck.state().notes_visible {
                return false;
            }
            deck.close_notes();
        }
        DeckKey::Preset(position) => {
            let Some(name) = deck.presets().table().name_at(position).map(str::to_string) else {
                return false;
            };
            deck.apply_preset(&name);
        }
        DeckKey::HistoryBack => deck.history_back(),
        DeckKey::HistoryForward => deck.history_forward(),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::DeckOptions;
    use crate::deck::hash::History;
    use crate::parser;

    fn deck(count: usize) -> Deck {
        let source: Vec<String> = (1..=count).map(|i| format!("# Slide {i}")).collect();
        let slides = parser::parse(&source.join("\n\n---\n\n")).slides;
        Deck::new(slides, DeckOptions::default(), History::new("#1")).unwrap()
    }

    fn swipe(router: &mut InputRouter, deck: &mut Deck, from: f32, to: f32) -> bool {
        router.handle(deck, DeckInput::PointerPressed { x: from });
        router.handle(deck, DeckInput::PointerReleased { x: to })
    }

    #[test]
    fn test_key_names() {
        assert_eq!(key_from_name("ArrowRight", false), Some(DeckKey::Next));
        assert_eq!(key_from_name(" ", false), Some(DeckKey::Next));
        assert_eq!(key_from_name("PageUp", false), Some(DeckKey::Previous));
        assert_eq!(key_from_name("ArrowLeft", true), Some(DeckKey::HistoryBack));
        assert_eq!(key_from_name("O", false), Some(DeckKey::ToggleOverview));
        assert_eq!(key_from_name("3", false), Some(DeckKey::Preset(2)));
        assert_eq!(key_from_name("q", false), None);
    }

    #[test]
    fn test_keyboard_walk_to_end() {
        let mut router = InputRouter::new();
        let mut deck = deck(5);
        for _ in 0..4 {
            router.handle(&mut deck, DeckInput::Key(DeckKey::Next));
        }
        assert_eq!(deck.fragment(), "#5");
        assert_eq!(deck.progress_width(), "100%");

        let history = deck.location().len();
        router.handle(&mut deck, DeckInput::Key(DeckKey::Next));
        assert_eq!(deck.current_index(), 4);
        assert_eq!(deck.location().len(), history);

        router.handle(&mut deck, DeckInput::Key(DeckKey::First));
        assert_eq!(deck.fragment(), "#1");
        router.handle(&mut deck, DeckInput::Key(DeckKey::Last));
        assert_eq!(deck.fragment(), "#5");
    }

    #[test]
    fn test_swipe_thresholds() {
        let mut router = InputRouter::new();
        let mut deck = deck(5);

        assert!(swipe(&mut router, &mut deck, 300.0, 250.0));
        assert_eq!(deck.current_index(), 1);

        assert!(!swipe(&mut router, &mut deck, 300.0, 280.0));
        assert_eq!(deck.current_index(), 1);

        assert!(swipe(&mut router, &mut deck, 100.0, 200.0));
        assert_eq!(deck.current_index(), 0);
    }

    #[test]
    fn test_swipe_ignored_in_overview() {
        let mut router = InputRouter::new();
        let mut deck = deck(5);
        router.handle(&mut deck, DeckInput::Key(DeckKey::ToggleOverview));
        assert!(!swipe(&mut router, &mut deck, 300.0, 100.0));
        assert_eq!(deck.current_index(), 0);
    }

    #[test]
    fn test_release_without_press() {
        let mut tracker = SwipeTracker::default();
        assert_eq!(tracker.release(10.0), None);
        tracker.press(0.0);
        assert_eq!(tracker.release(-41.0), Some(1));
        assert_eq!(tracker.release(-80.0), None);
    }

    #[test]
    fn test_cell_click_leaves_overview() {
        let mut router = InputRouter::new();
        let mut deck = deck(5);
        router.handle(&mut deck, DeckInput::Key(DeckKey::ToggleOverview));
        router.handle(&mut deck, DeckInput::CellClicked(3));
        assert!(!deck.state().overview);
        assert_eq!(deck.current_index(), 3);
        let active: Vec<bool> = deck.animator().markers().iter().map(|m| m.active).collect();
        assert_eq!(active, vec![false, false, false, true, false]);
    }

    #[test]
    fn test_escape_only_closes_open_notes() {
        let mut router = InputRouter::new();
        let mut deck = deck(2);
        assert!(!router.handle(&mut deck, DeckInput::Key(DeckKey::Escape)));
        router.handle(&mut deck, DeckInput::Key(DeckKey::ToggleNotes));
        assert!(router.handle(&mut deck, DeckInput::Key(DeckKey::Escape)));
        assert!(!deck.state().notes_visible);
    }

    #[test]
    fn test_preset_hotkeys_follow_table_order() {
        let mut router = InputRouter::new();
        let mut deck = deck(2);
        router.handle(&mut deck, DeckInput::Key(DeckKey::Preset(0)));
        assert_eq!(deck.presets().active(), Some("subtle"));
        assert!(!router.handle(&mut deck, DeckInput::Key(DeckKey::Preset(7))));
        assert_eq!(deck.presets().active(), Some("subtle"));
    }

    #[test]
    fn test_dots_and_buttons() {
        let mut router = InputRouter::new();
        let mut deck = deck(5);
        router.handle(&mut deck, DeckInput::DotClicked(2));
        router.handle(&mut deck, DeckInput::NextClicked);
        assert_eq!(deck.current_index(), 3);
        router.handle(&mut deck, DeckInput::PrevClicked);
        router.handle(&mut deck, DeckInput::FragmentChanged("#5".to_string()));
        assert_eq!(deck.current_index(), 4);
    }
}
