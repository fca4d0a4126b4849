//! Slide anchors: the `#N` fragment that deep-links into a deck.
//!
//! Anchors are 1-based on the outside and 0-based everywhere else. Anything
//! that does not name an existing slide falls back to the first one.

/// Parse a fragment such as `#3` into a 0-based slide index.
///
/// Returns 0 for an empty fragment, a non-numeric one, `#0`, or a number past
/// the last slide.
pub fn parse_fragment(fragment: &str, slide_count: usize) -> usize {
    let digits = fragment.strip_prefix('#').unwrap_or(fragment).trim();
    match digits.parse::<usize>() {
        Ok(n) if n >= 1 && n <= slide_count => n - 1,
        _ => 0,
    }
}

/// Encode a 0-based slide index as a 1-based fragment.
pub fn encode_fragment(index: usize) -> String {
    format!("#{}", index + 1)
}

/// Split `deck.md#4` into the file part and the fragment, if any.
pub fn split_anchor(target: &str) -> (&str, Option<&str>) {
    match target.rfind('#') {
        Some(pos) => (&target[..pos], Some(&target[pos..])),
        None => (target, None),
    }
}

/// Where the current anchor lives.
///
/// The deck writes through this on every internal navigation; external
/// changes (back/forward) come back in as fragment-change events.
pub trait Location {
    fn fragment(&self) -> &str;

    /// Record a new fragment. Implementations may assume it differs from the
    /// current one.
    fn set_fragment(&mut self, fragment: String);

    /// Overwrite the current fragment without recording a new entry.
    fn replace_fragment(&mut self, fragment: String);

    /// Step back one entry, returning the fragment now current.
    fn back(&mut self) -> Option<String> {
        None
    }

    /// Step forward one entry, returning the fragment now current.
    fn forward(&mut self) -> Option<String> {
        None
    }
}

/// In-memory anchor history with back/forward navigation.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
}

impl History {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            cursor: 0,
        }
    }

    /// Number of recorded entries, including the initial one.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new("")
    }
}

impl Location for History {
    fn fragment(&self) -> &str {
        &self.entries[self.cursor]
    }

    fn set_fragment(&mut self, fragment: String) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(fragment);
        self.cursor = self.entries.len() - 1;
    }

    fn replace_fragment(&mut self, fragment: String) {
        self.entries[self.cursor] = fragment;
    }

    fn back(&mut self) -> Option<String> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].clone())
    }

    fn forward(&mut self) -> Option<String> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(parse_fragment("#1", 5), 0);
        assert_eq!(parse_fragment("#5", 5), 4);
        assert_eq!(parse_fragment("3", 5), 2);
        assert_eq!(parse_fragment("# 2 ", 5), 1);
    }

    #[test]
    fn test_parse_fallbacks() {
        assert_eq!(parse_fragment("", 5), 0);
        assert_eq!(parse_fragment("#", 5), 0);
        assert_eq!(parse_fragment("#0", 5), 0);
        assert_eq!(parse_fragment("#6", 5), 0);
        assert_eq!(parse_fragment("#-2", 5), 0);
        assert_eq!(parse_fragment("#intro", 5), 0);
        assert_eq!(parse_fragment("#2.5", 5), 0);
    }

    #[test]
    fn test_encode_is_one_based() {
        assert_eq!(encode_fragment(0), "#1");
        assert_eq!(encode_fragment(9), "#10");
    }

    #[test]
    fn test_split_anchor() {
        assert_eq!(split_anchor("talk.md#3"), ("talk.md", Some("#3")));
        assert_eq!(split_anchor("talk.md"), ("talk.md", None));
    }

    #[test]
    fn test_history_back_forward() {
        let mut history = History::new("#1");
        history.set_fragment("#2".to_string());
        history.set_fragment("#3".to_string());
        assert_eq!(history.len(), 3);

        assert_eq!(history.back().as_deref(), Some("#2"));
        assert_eq!(history.back().as_deref(), Some("#1"));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward().as_deref(), Some("#2"));
        assert_eq!(history.fragment(), "#2");
    }

    #[test]
    fn test_history_set_drops_forward_entries() {
        let mut history = History::new("#1");
        history.set_fragment("#2".to_string());
        history.set_fragment("#3".to_string());
        history.back();
        history.set_fragment("#5".to_string());
        assert!(!history.can_go_forward());
        assert_eq!(history.len(), 3);
        assert_eq!(history.fragment(), "#5");
    }

    #[test]
    fn test_history_replace_keeps_length() {
        let mut history = History::default();
        history.replace_fragment("#2".to_string());
        assert_eq!(history.len(), 1);
        assert_eq!(history.fragment(), "#2");
        assert!(!history.can_go_back());
    }
}
