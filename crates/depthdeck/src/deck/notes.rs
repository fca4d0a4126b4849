pub const EMPTY_NOTES: &str = "No notes for this slide.";

/// Text shown in the speaker notes side panel.
///
/// Whether the panel is open lives in [`DeckState::notes_visible`]; this only
/// tracks what it shows.
///
/// [`DeckState::notes_visible`]: super::state::DeckState::notes_visible
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesPanel {
    text: String,
}

impl Default for NotesPanel {
    fn default() -> Self {
        Self {
            text: EMPTY_NOTES.to_string(),
        }
    }
}

impl NotesPanel {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the panel text. Blank notes show the empty-state text.
    pub fn load(&mut self, note: Option<&str>) {
        self.text = match note.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => EMPTY_NOTES.to_string(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_trims_text() {
        let mut panel = NotesPanel::default();
        panel.load(Some("  Mention the demo.\n"));
        assert_eq!(panel.text(), "Mention the demo.");
    }

    #[test]
    fn test_missing_notes_show_placeholder() {
        let mut panel = NotesPanel::default();
        assert_eq!(panel.text(), EMPTY_NOTES);
        panel.load(Some("first"));
        panel.load(None);
        assert_eq!(panel.text(), EMPTY_NOTES);
        panel.load(Some("   "));
        assert_eq!(panel.text(), EMPTY_NOTES);
    }
}
