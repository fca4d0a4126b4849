/// Bound a requested slide index into `[0, count - 1]`.
///
/// A `count` of zero has no valid index; callers never build a deck in that
/// case, so the result is `0`.
pub fn clamp_index(requested: isize, count: usize) -> usize {
    if count == 0 || requested <= 0 {
        return 0;
    }
    (requested as usize).min(count - 1)
}

/// Direction of a navigation, derived from the old and new index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn between(from: usize, to: usize) -> Self {
        if to > from {
            Self::Forward
        } else {
            Self::Backward
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }
}

/// The mutable navigation state of a deck.
///
/// Only [`crate::deck::Deck`] writes to it; renderers read a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct DeckState {
    pub current_index: usize,
    pub overview: bool,
    pub notes_visible: bool,
}

impl DeckState {
    pub fn at(index: usize) -> Self {
        Self {
            current_index: index,
            ..Self::default()
        }
    }

    /// Progress ratio across the deck, in `[0, 1]`.
    pub fn progress(&self, count: usize) -> f32 {
        let last = count.saturating_sub(1).max(1);
        (self.current_index.min(last) as f32 / last as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inside_range() {
        assert_eq!(clamp_index(3, 5), 3);
        assert_eq!(clamp_index(0, 5), 0);
        assert_eq!(clamp_index(4, 5), 4);
    }

    #[test]
    fn test_clamp_outside_range() {
        assert_eq!(clamp_index(-1, 5), 0);
        assert_eq!(clamp_index(-100, 5), 0);
        assert_eq!(clamp_index(5, 5), 4);
        assert_eq!(clamp_index(isize::MAX, 5), 4);
    }

    #[test]
    fn test_clamp_empty_deck() {
        assert_eq!(clamp_index(7, 0), 0);
    }

    #[test]
    fn test_direction_between() {
        assert_eq!(Direction::between(1, 2), Direction::Forward);
        assert_eq!(Direction::between(2, 1), Direction::Backward);
    }

    #[test]
    fn test_progress_single_slide() {
        assert_eq!(DeckState::at(0).progress(1), 0.0);
    }

    #[test]
    fn test_progress_last_slide() {
        assert_eq!(DeckState::at(4).progress(5), 1.0);
        assert_eq!(DeckState::at(2).progress(5), 0.5);
    }
}
