//! Named depth presets: parallax strength plus blur radii, applied together.

use serde::{Deserialize, Serialize};

use super::parallax::ParallaxEngine;

pub const DEFAULT_PRESET: &str = "deep";

/// Blur radius slots, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurSlot {
    Bg1,
    Layer3,
    Layer2,
    Main,
}

impl BlurSlot {
    pub const ALL: [BlurSlot; 4] = [Self::Bg1, Self::Layer3, Self::Layer2, Self::Main];

    pub fn name(self) -> &'static str {
        match self {
            Self::Bg1 => "bg1",
            Self::Layer3 => "layer3",
            Self::Layer2 => "layer2",
            Self::Main => "main",
        }
    }

    pub fn var_name(self) -> String {
        format!("--blur-{}", self.name())
    }

    /// Slot for the layer at `position` in a stack of `count`, back to front.
    ///
    /// The back layer takes `bg1` and the front layer `main`; layers in
    /// between are spread over the middle slots.
    pub fn for_layer(position: usize, count: usize) -> Self {
        if count <= 1 {
            return Self::Main;
        }
        let last = Self::ALL.len() - 1;
        let scaled = (position.min(count - 1) * last) as f32 / (count - 1) as f32;
        Self::ALL[(scaled.round() as usize).min(last)]
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthPreset {
    pub strength_x: f32,
    pub strength_y: f32,
    /// Blur radii in [`BlurSlot::ALL`] order, in pixels.
    pub blur: [f32; 4],
}

impl DepthPreset {
    pub const fn new(strength_x: f32, strength_y: f32, blur: [f32; 4]) -> Self {
        Self {
            strength_x,
            strength_y,
            blur,
        }
    }
}

/// Ordered preset table. Order drives indicator layout and number hotkeys.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetTable {
    entries: Vec<(String, DepthPreset)>,
}

impl Default for PresetTable {
    fn default() -> Self {
        Self {
            entries: vec![
                (
                    "subtle".to_string(),
                    DepthPreset::new(25.0, 18.0, [1.5, 2.0, 1.2, 0.0]),
                ),
                (
                    "medium".to_string(),
                    DepthPreset::new(40.0, 25.0, [2.5, 3.0, 1.6, 0.0]),
                ),
                (
                    "deep".to_string(),
                    DepthPreset::new(60.0, 32.0, [4.0, 4.5, 2.2, 0.4]),
                ),
            ],
        }
    }
}

impl PresetTable {
    /// Add a preset, replacing any existing one with the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, preset: DepthPreset) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = preset,
            None => self.entries.push((name, preset)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&DepthPreset> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, preset)| preset)
    }

    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.entries.get(position).map(|(n, _)| n.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DepthPreset)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct DepthPresetController {
    table: PresetTable,
    active: Option<String>,
    blur: [f32; 4],
}

impl DepthPresetController {
    pub fn new(table: PresetTable) -> Self {
        Self {
            table,
            active: None,
            blur: [0.0; 4],
        }
    }

    pub fn table(&self) -> &PresetTable {
        &self.table
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn blur(&self, slot: BlurSlot) -> f32 {
        self.blur[slot.index()]
    }

    /// Apply the preset called `name` to `parallax` and the blur radii.
    ///
    /// Unknown names leave everything untouched and return `false`. On success
    /// the parallax offsets are recomputed from the last pointer position.
    pub fn apply(&mut self, name: &str, parallax: &mut ParallaxEngine, current: usize) -> bool {
        let Some(preset) = self.table.get(name).copied() else {
            tracing::debug!(name, "ignoring unknown preset");
            return false;
        };
        parallax.set_strengths(preset.strength_x, preset.strength_y);
        self.blur = preset.blur;
        self.active = Some(name.to_string());
        parallax.refresh(current);
        tracing::debug!(
            name,
            strength_x = preset.strength_x,
            strength_y = preset.strength_y,
            "depth preset applied"
        );
        true
    }

    /// Fine-tune one blur radius. The active preset stays selected.
    pub fn set_blur(&mut self, slot: BlurSlot, radius: f32) {
        let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        self.blur[slot.index()] = radius;
    }

    /// `(name, is_active)` for every preset, in table order.
    pub fn indicators(&self) -> Vec<(&str, bool)> {
        self.table
            .names()
            .map(|name| (name, self.active.as_deref() == Some(name)))
            .collect()
    }
}
