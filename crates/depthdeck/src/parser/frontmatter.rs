use serde::Deserialize;

use crate::deck::parallax::ParallaxLayer;
use crate::deck::preset::DepthPreset;
use crate::deck::transition::MarkerClasses;

/// Deck-level settings from the YAML block at the top of the file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeckMeta {
    pub title: Option<String>,
    pub theme: Option<String>,
    pub preset: Option<String>,
    pub slide_shift: Option<f32>,
    pub layers: Option<Vec<ParallaxLayer>>,
    pub presets: Vec<NamedPreset>,
    pub classes: Option<MarkerClasses>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedPreset {
    pub name: String,
    #[serde(flatten)]
    pub preset: DepthPreset,
}

/// Split `content` into its frontmatter and the remaining body.
///
/// A deck without a leading `---` block gets default settings. A block that
/// fails to parse is logged and ignored; the body is still returned.
pub fn extract(content: &str) -> (DeckMeta, String) {
    let content = content.replace("\r\n", "\n");
    let Some(rest) = content.strip_prefix("---\n") else {
        return (DeckMeta::default(), content);
    };

    let mut yaml_end = None;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            yaml_end = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }

    let Some((yaml_len, body_start)) = yaml_end else {
        tracing::warn!("frontmatter is never closed, treating it as slide content");
        return (DeckMeta::default(), content);
    };

    let yaml = &rest[..yaml_len];
    let body = rest[body_start..].to_string();
    if yaml.trim().is_empty() {
        return (DeckMeta::default(), body);
    }
    match serde_yaml::from_str::<DeckMeta>(yaml) {
        Ok(meta) => (meta, body),
        Err(e) => {
            tracing::warn!("ignoring invalid frontmatter: {e}");
            (DeckMeta::default(), body)
        }
    }
}
