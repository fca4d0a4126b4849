//! Pointer- and slide-driven offsets for the background layers.
//!
//! Each layer moves by `depth` times the pointer's distance from the centre
//! of the deck box, scaled by the active strengths. Layers also drift
//! horizontally by `slide_shift * depth` pixels per slide. The two terms are
//! summed without clamping, so long decks drift far; set `slide_shift` to 0
//! to decouple the background from the slide position.

use serde::{Deserialize, Serialize};

/// Per-slide horizontal drift, in pixels at depth 1.0.
pub const DEFAULT_SLIDE_SHIFT: f32 = 140.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallaxLayer {
    pub name: String,
    #[serde(rename = "depth")]
    pub depth_factor: f32,
}

impl ParallaxLayer {
    pub fn new(name: impl Into<String>, depth_factor: f32) -> Self {
        Self {
            name: name.into(),
            depth_factor,
        }
    }

    /// The four stacked layers a deck gets when it names none.
    pub fn default_stack() -> Vec<Self> {
        vec![
            Self::new("bg1", 0.15),
            Self::new("layer3", 0.35),
            Self::new("layer2", 0.6),
            Self::new("main", 1.0),
        ]
    }
}

/// The box the pointer position is measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PointerBox {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Pointer position relative to the box centre, in `-0.5..=0.5` while
    /// the pointer is inside the box.
    pub fn relative(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        if self.is_degenerate() {
            return None;
        }
        let rel_x = (x - self.left) / self.width - 0.5;
        let rel_y = (y - self.top) / self.height - 0.5;
        (rel_x.is_finite() && rel_y.is_finite()).then_some((rel_x, rel_y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayerOffset {
    pub x: f32,
    pub y: f32,
}

impl LayerOffset {
    pub fn transform(&self) -> String {
        format!("translate3d({}px, {}px, 0)", self.x, self.y)
    }
}

#[derive(Debug, Clone)]
pub struct ParallaxEngine {
    layers: Vec<ParallaxLayer>,
    offsets: Vec<LayerOffset>,
    strength_x: f32,
    strength_y: f32,
    slide_shift: f32,
    /// Last pointer position relative to the box centre.
    pointer: (f32, f32),
}

impl ParallaxEngine {
    pub fn new(layers: Vec<ParallaxLayer>, slide_shift: f32) -> Self {
        let offsets = vec![LayerOffset::default(); layers.len()];
        Self {
            layers,
            offsets,
            strength_x: 0.0,
            strength_y: 0.0,
            slide_shift,
            pointer: (0.0, 0.0),
        }
    }

    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }

    pub fn offsets(&self) -> &[LayerOffset] {
        &self.offsets
    }

    pub fn strengths(&self) -> (f32, f32) {
        (self.strength_x, self.strength_y)
    }

    pub fn set_strengths(&mut self, strength_x: f32, strength_y: f32) {
        self.strength_x = strength_x;
        self.strength_y = strength_y;
    }

    pub fn slide_shift(&self) -> f32 {
        self.slide_shift
    }

    pub fn last_pointer(&self) -> (f32, f32) {
        self.pointer
    }

    /// Recompute offsets for a pointer at `(x, y)` inside `bounds`.
    ///
    /// Returns `false` and keeps the previous offsets when `bounds` has no
    /// area.
    pub fn pointer_moved(&mut self, x: f32, y: f32, bounds: PointerBox, current: usize) -> bool {
        let Some(relative) = bounds.relative(x, y) else {
            tracing::trace!(?bounds, "skipping parallax update for empty box");
            return false;
        };
        self.pointer = relative;
        self.refresh(current);
        true
    }

    /// Recompute offsets from the last known pointer position.
    pub fn refresh(&mut self, current: usize) {
        let (rel_x, rel_y) = self.pointer;
        let slide_drift = current as f32 * self.slide_shift;
        for (layer, offset) in self.layers.iter().zip(self.offsets.iter_mut()) {
            let depth = layer.depth_factor;
            *offset = LayerOffset {
                x: rel_x * depth * self.strength_x + slide_drift * depth,
                y: rel_y * depth * self.strength_y,
            };
        }
    }
}
