//! Headless dump of everything a renderer would read from a deck.

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::deck::Deck;
use crate::deck::state::DeckState;
use crate::deck::style::StyleVars;
use crate::session::{Session, StartOptions};

#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub title: String,
    pub fragment: &'a str,
    pub counter: String,
    pub progress: String,
    pub state: DeckState,
    pub preset: Option<&'a str>,
    pub presets: Vec<PresetIndicator<'a>>,
    pub style: StyleVars,
    pub slides: Vec<SlideSnapshot<'a>>,
}

#[derive(Debug, Serialize)]
pub struct PresetIndicator<'a> {
    pub name: &'a str,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct SlideSnapshot<'a> {
    pub number: usize,
    pub title: &'a str,
    pub classes: Vec<&'a str>,
    pub offset: isize,
    pub far: bool,
    pub depth: f32,
    pub has_notes: bool,
}

pub fn snapshot<'a>(deck: &'a Deck, title: String) -> Snapshot<'a> {
    let slides = deck
        .slides()
        .iter()
        .filter_map(|slide| {
            let view = deck.slide_view(slide.index)?;
            Some(SlideSnapshot {
                number: slide.index + 1,
                title: &slide.title,
                classes: deck.classes().for_markers(&view.markers),
                offset: view.offset,
                far: view.far,
                depth: view.depth,
                has_notes: slide.has_notes(),
            })
        })
        .collect();

    Snapshot {
        title,
        fragment: deck.fragment(),
        counter: deck.counter_text(),
        progress: deck.progress_width(),
        state: deck.state(),
        preset: deck.presets().active(),
        presets: deck
            .presets()
            .indicators()
            .into_iter()
            .map(|(name, active)| PresetIndicator { name, active })
            .collect(),
        style: deck.style_vars(),
        slides,
    }
}

pub fn run(target: &str, start: &StartOptions, json: bool) -> Result<()> {
    let config = Config::load_or_default();
    let session = Session::open(target, start, &config)?;
    let title = session.title();
    let deck = session.into_deck()?;
    let snapshot = snapshot(&deck, title);
    let text = if json {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_yaml::to_string(&snapshot)?
    };
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::DeckOptions;
    use crate::deck::hash::History;
    use crate::parser;

    #[test]
    fn test_snapshot_of_last_slide() {
        let slides = parser::parse("# One\n\n---\n\n# Two\n\nNotes:\nhi\n\n---\n\n# Three").slides;
        let deck: Deck = Deck::new(slides, DeckOptions::default(), History::new("#3")).unwrap();
        let snap = snapshot(&deck, "Talk".to_string());

        assert_eq!(snap.counter, "3 / 3");
        assert_eq!(snap.progress, "100%");
        assert_eq!(snap.preset, Some("deep"));
        assert_eq!(snap.slides[2].classes, vec!["is-active"]);
        assert!(snap.slides[0].classes.is_empty());
        assert!(snap.slides[0].far);
        assert!(snap.slides[1].has_notes);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["state"]["current_index"], 2);
        assert_eq!(json["style"]["--progress"], "100%");
    }
}
