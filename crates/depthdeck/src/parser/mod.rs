pub mod frontmatter;
pub mod splitter;

use std::sync::LazyLock;

use regex::Regex;

pub use frontmatter::DeckMeta;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@([A-Za-z0-9_-]+):\s*(.*)$").expect("directive pattern is valid")
});

#[derive(Debug, Clone)]
pub struct Presentation {
    pub meta: DeckMeta,
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    /// 0-based position in the deck.
    pub index: usize,
    pub title: String,
    pub notes: Option<String>,
    /// Per-slide depth tag; scales how far the slide content floats with the pointer.
    pub depth: Option<f32>,
    /// Slide text without directives, notes or the title heading.
    pub body: Vec<String>,
}

impl Slide {
    pub fn has_notes(&self) -> bool {
        self.notes.as_deref().is_some_and(|n| !n.trim().is_empty())
    }
}

pub fn parse(content: &str) -> Presentation {
    let (meta, body) = frontmatter::extract(content);
    let slides = splitter::split(&body)
        .into_iter()
        .enumerate()
        .map(|(index, raw)| parse_slide(index, raw))
        .collect();
    Presentation { meta, slides }
}

fn parse_slide(index: usize, raw: String) -> Slide {
    let mut title_directive = None;
    let mut depth = None;
    let mut notes: Vec<String> = Vec::new();
    let mut heading = None;
    let mut body = Vec::new();
    let mut in_notes = false;

    for line in raw.lines() {
        let trimmed = line.trim();
        if in_notes {
            notes.push(line.to_string());
            continue;
        }
        if trimmed == "???" || trimmed.eq_ignore_ascii_case("notes:") {
            in_notes = true;
            continue;
        }
        if let Some(caps) = DIRECTIVE.captures(trimmed) {
            let value = caps[2].trim();
            match &caps[1] {
                "title" => title_directive = Some(value.to_string()),
                "notes" => notes.push(value.to_string()),
                "depth" => match value.parse::<f32>() {
                    Ok(d) if d.is_finite() => depth = Some(d),
                    _ => tracing::warn!(slide = index + 1, value, "ignoring invalid @depth"),
                },
                other => tracing::debug!(slide = index + 1, directive = other, "unknown directive"),
            }
            continue;
        }
        if heading.is_none() && trimmed.starts_with('#') {
            let text = trimmed.trim_start_matches('#').trim();
            if !text.is_empty() {
                heading = Some(text.to_string());
                continue;
            }
        }
        body.push(line.to_string());
    }

    while body.first().is_some_and(|l| l.trim().is_empty()) {
        body.remove(0);
    }
    while body.last().is_some_and(|l| l.trim().is_empty()) {
        body.pop();
    }

    let notes = notes.join("\n").trim().to_string();
    let title = title_directive
        .or(heading)
        .unwrap_or_else(|| format!("Slide {}", index + 1));

    Slide {
        index,
        title,
        notes: (!notes.is_empty()).then_some(notes),
        depth,
        body,
    }
}
