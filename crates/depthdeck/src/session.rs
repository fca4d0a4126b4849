//! Opening a deck file: reading it, merging config, and picking the start anchor.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{Config, StartMode};
use crate::deck::hash::{History, encode_fragment, split_anchor};
use crate::deck::{Deck, DeckOptions};
use crate::parser::{self, Presentation};

/// Start-up choices made on the command line.
#[derive(Debug, Clone, Default)]
pub struct StartOptions {
    /// 1-based slide number.
    pub slide: Option<usize>,
    pub overview: bool,
    pub preset: Option<String>,
}

#[derive(Debug)]
pub struct Session {
    pub path: PathBuf,
    pub presentation: Presentation,
    pub options: DeckOptions,
    /// Anchor the deck starts from, e.g. `#3`. Empty means the first slide.
    pub fragment: String,
    pub overview: bool,
    pub theme: String,
}

impl Session {
    /// Open `target`, which is a path optionally followed by `#N`.
    pub fn open(target: &str, start: &StartOptions, config: &Config) -> Result<Self> {
        let (path, anchor) = resolve_target(target);
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let presentation = parser::parse(&content);
        tracing::debug!(
            path = %path.display(),
            slides = presentation.slides.len(),
            "deck loaded"
        );

        let options = DeckOptions::resolve(&presentation.meta, config, start.preset.as_deref());
        let (fragment, overview) = start_anchor(start, anchor, config.start_mode());
        let theme = presentation
            .meta
            .theme
            .as_deref()
            .or(config.theme())
            .unwrap_or("dark")
            .to_string();

        Ok(Self {
            path,
            presentation,
            options,
            fragment,
            overview,
            theme,
        })
    }

    pub fn title(&self) -> String {
        self.presentation.meta.title.clone().unwrap_or_else(|| {
            format!(
                "depthdeck - {}",
                self.path.file_name().unwrap_or_default().to_string_lossy()
            )
        })
    }

    /// Build the controller, already in overview if requested.
    pub fn into_deck(self) -> Result<Deck> {
        let Self {
            path,
            presentation,
            options,
            fragment,
            overview,
            ..
        } = self;
        let mut deck = Deck::new(
            presentation.slides,
            options,
            History::new(fragment),
        )
        .ok_or_else(|| anyhow::anyhow!("No slides found in {}", path.display()))?;
        if overview {
            deck.toggle_overview();
        }
        Ok(deck)
    }
}

fn resolve_target(target: &str) -> (PathBuf, Option<String>) {
    let whole = Path::new(target);
    if whole.exists() {
        return (whole.to_path_buf(), None);
    }
    let (file, anchor) = split_anchor(target);
    (PathBuf::from(file), anchor.map(str::to_string))
}

/// `--slide` beats the anchor in the target, which beats the configured start mode.
fn start_anchor(start: &StartOptions, anchor: Option<String>, mode: StartMode) -> (String, bool) {
    if let Some(slide) = start.slide {
        return (encode_fragment(slide.saturating_sub(1)), start.overview);
    }
    if let Some(anchor) = anchor {
        return (anchor, start.overview);
    }
    match mode {
        StartMode::First => (String::new(), start.overview),
        StartMode::Overview => (String::new(), true),
        StartMode::Slide(n) => (encode_fragment(n - 1), start.overview),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn deck_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_anchor_in_target() {
        let file = deck_file("# A\n\n---\n\n# B\n\n---\n\n# C");
        let target = format!("{}#2", file.path().display());
        let session = Session::open(&target, &StartOptions::default(), &Config::default()).unwrap();
        assert_eq!(session.fragment, "#2");
        let deck = session.into_deck().unwrap();
        assert_eq!(deck.current_index(), 1);
    }

    #[test]
    fn test_start_precedence() {
        let flags = StartOptions {
            slide: Some(4),
            ..StartOptions::default()
        };
        assert_eq!(
            start_anchor(&flags, Some("#2".to_string()), StartMode::Slide(3)),
            ("#4".to_string(), false)
        );
        let plain = StartOptions::default();
        assert_eq!(
            start_anchor(&plain, Some("#2".to_string()), StartMode::Slide(3)),
            ("#2".to_string(), false)
        );
        assert_eq!(
            start_anchor(&plain, None, StartMode::Slide(3)),
            ("#3".to_string(), false)
        );
        assert_eq!(
            start_anchor(&plain, None, StartMode::Overview),
            (String::new(), true)
        );
    }

    #[test]
    fn test_missing_file() {
        let err = Session::open("/nonexistent/talk.md#2", &StartOptions::default(), &Config::default())
            .unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_empty_deck_is_an_error() {
        let file = deck_file("---\ntitle: Empty\n---\n");
        let session =
            Session::open(&file.path().display().to_string(), &StartOptions::default(), &Config::default())
                .unwrap();
        assert_eq!(session.title(), "Empty");
        assert!(session.into_deck().is_err());
    }

    #[test]
    fn test_frontmatter_theme_and_preset() {
        let file = deck_file("---\ntheme: light\npreset: medium\n---\n# One");
        let session =
            Session::open(&file.path().display().to_string(), &StartOptions::default(), &Config::default())
                .unwrap();
        assert_eq!(session.theme, "light");
        let deck = session.into_deck().unwrap();
        assert_eq!(deck.presets().active(), Some("medium"));
    }
}
