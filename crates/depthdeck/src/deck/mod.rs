//! The deck controller: navigation state plus everything derived from it.
//!
//! [`Deck`] is the only thing that mutates [`DeckState`]. Renderers read the
//! derived values (markers, offsets, style vars) and hand completion tickets
//! back; they never touch the state directly.

pub mod glow;
pub mod hash;
pub mod notes;
pub mod parallax;
pub mod preset;
pub mod state;
pub mod style;
pub mod transition;

use crate::config::Config;
use crate::parser::{DeckMeta, Slide};

use glow::Glow;
use hash::{History, Location, encode_fragment, parse_fragment};
use notes::NotesPanel;
use parallax::{DEFAULT_SLIDE_SHIFT, ParallaxEngine, ParallaxLayer, PointerBox};
use preset::{BlurSlot, DEFAULT_PRESET, DepthPresetController, PresetTable};
use state::{DeckState, Direction, clamp_index};
use style::{StyleVars, percent};
use transition::{CompletionTicket, MarkerClasses, SlideMarkers, TransitionAnimator};

/// Tunables a deck is built with.
#[derive(Debug, Clone)]
pub struct DeckOptions {
    pub layers: Vec<ParallaxLayer>,
    pub presets: PresetTable,
    pub preset: String,
    pub slide_shift: f32,
    pub classes: MarkerClasses,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            layers: ParallaxLayer::default_stack(),
            presets: PresetTable::default(),
            preset: DEFAULT_PRESET.to_string(),
            slide_shift: DEFAULT_SLIDE_SHIFT,
            classes: MarkerClasses::default(),
        }
    }
}

impl DeckOptions {
    /// Merge built-in defaults, user config and deck frontmatter.
    ///
    /// An explicit `preset` (from the command line) beats the deck, which
    /// beats the config file.
    pub fn resolve(meta: &DeckMeta, config: &Config, preset: Option<&str>) -> Self {
        let mut presets = PresetTable::default();
        for (name, p) in &config.presets {
            presets.insert(name.clone(), *p);
        }
        for named in &meta.presets {
            presets.insert(named.name.clone(), named.preset);
        }

        let preset = preset
            .or(meta.preset.as_deref())
            .or(config.preset())
            .unwrap_or(DEFAULT_PRESET)
            .to_string();

        Self {
            layers: meta
                .layers
                .clone()
                .unwrap_or_else(ParallaxLayer::default_stack),
            presets,
            preset,
            slide_shift: meta
                .slide_shift
                .filter(|s| valid_shift(*s))
                .or(config.slide_shift().filter(|s| valid_shift(*s)))
                .unwrap_or(DEFAULT_SLIDE_SHIFT),
            classes: meta.classes.clone().unwrap_or_default(),
        }
    }
}

fn valid_shift(shift: f32) -> bool {
    let valid = shift.is_finite() && shift >= 0.0;
    if !valid {
        tracing::warn!(shift, "ignoring invalid slide_shift");
    }
    valid
}

/// What the renderer needs to know about one slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideView {
    pub index: usize,
    pub markers: SlideMarkers,
    /// Position relative to the current slide (`-1`, `0`, `1`, ...).
    pub offset: isize,
    /// More than one slide away from the current one.
    pub far: bool,
    pub depth: f32,
}

#[derive(Debug)]
pub struct Deck<L: Location = History> {
    slides: Vec<Slide>,
    state: DeckState,
    location: L,
    animator: TransitionAnimator,
    parallax: ParallaxEngine,
    presets: DepthPresetController,
    notes: NotesPanel,
    classes: MarkerClasses,
    tickets: Vec<CompletionTicket>,
}

impl<L: Location> Deck<L> {
    /// Build a controller positioned at the slide `location` points to.
    ///
    /// Returns `None` for a deck without slides.
    pub fn new(slides: Vec<Slide>, options: DeckOptions, mut location: L) -> Option<Self> {
        if slides.is_empty() {
            tracing::debug!("deck has no slides, staying inert");
            return None;
        }
        let count = slides.len();
        let index = parse_fragment(location.fragment(), count);
        let anchor = encode_fragment(index);
        if location.fragment() != anchor {
            location.replace_fragment(anchor);
        }

        let mut parallax = ParallaxEngine::new(options.layers, options.slide_shift);
        let mut presets = DepthPresetController::new(options.presets);
        if !presets.apply(&options.preset, &mut parallax, index) {
            tracing::warn!(preset = %options.preset, "unknown preset, using {DEFAULT_PRESET}");
            presets.apply(DEFAULT_PRESET, &mut parallax, index);
        }
        parallax.refresh(index);

        tracing::debug!(slides = count, start = index + 1, "deck ready");
        Some(Self {
            animator: TransitionAnimator::new(count, index),
            state: DeckState::at(index),
            slides,
            location,
            parallax,
            presets,
            notes: NotesPanel::default(),
            classes: options.classes,
            tickets: Vec::new(),
        })
    }

    pub fn state(&self) -> DeckState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn current_slide(&self) -> &Slide {
        &self.slides[self.state.current_index]
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn fragment(&self) -> &str {
        self.location.fragment()
    }

    pub fn animator(&self) -> &TransitionAnimator {
        &self.animator
    }

    pub fn parallax(&self) -> &ParallaxEngine {
        &self.parallax
    }

    pub fn presets(&self) -> &DepthPresetController {
        &self.presets
    }

    pub fn notes(&self) -> &NotesPanel {
        &self.notes
    }

    pub fn classes(&self) -> &MarkerClasses {
        &self.classes
    }

    /// Navigate to `requested`, clamped into the deck.
    pub fn go_to(&mut self, requested: isize) {
        let target = clamp_index(requested, self.slides.len());
        self.navigate(target, true);
    }

    pub fn step_by(&mut self, delta: isize) {
        let current = self.state.current_index as isize;
        self.go_to(current.saturating_add(delta));
    }

    /// React to an anchor change that did not come from this deck.
    ///
    /// The anchor is not written back.
    pub fn on_fragment_change(&mut self, fragment: &str) {
        let target = parse_fragment(fragment, self.slides.len());
        tracing::debug!(fragment, target = target + 1, "external anchor change");
        self.navigate(target, false);
    }

    pub fn history_back(&mut self) {
        if let Some(fragment) = self.location.back() {
            self.on_fragment_change(&fragment);
        }
    }

    pub fn history_forward(&mut self) {
        if let Some(fragment) = self.location.forward() {
            self.on_fragment_change(&fragment);
        }
    }

    fn navigate(&mut self, target: usize, write_anchor: bool) {
        let from = self.state.current_index;
        if target == from {
            return;
        }
        self.state.current_index = target;

        if write_anchor {
            let anchor = encode_fragment(target);
            if self.location.fragment() != anchor {
                self.location.set_fragment(anchor);
            }
        }

        if !self.state.overview {
            let direction = Direction::between(from, target);
            let tickets = self.animator.begin(from, target, direction);
            self.tickets.extend(tickets);
        }
        if self.state.notes_visible {
            self.notes.load(self.slides[target].notes.as_deref());
        }
        self.parallax.refresh(target);

        tracing::debug!(from = from + 1, to = target + 1, "navigated");
    }

    pub fn toggle_overview(&mut self) {
        self.state.overview = !self.state.overview;
        if self.state.overview {
            self.animator.show_all();
        } else {
            self.animator.settle(self.state.current_index);
        }
        self.tickets.clear();
        tracing::debug!(overview = self.state.overview, "overview toggled");
    }

    pub fn toggle_notes(&mut self) {
        if self.state.notes_visible {
            self.close_notes();
        } else {
            self.state.notes_visible = true;
            self.notes
                .load(self.slides[self.state.current_index].notes.as_deref());
        }
    }

    pub fn close_notes(&mut self) {
        self.state.notes_visible = false;
    }

    /// Recompute parallax for a pointer at `(x, y)` inside `bounds`.
    pub fn pointer_moved(&mut self, x: f32, y: f32, bounds: PointerBox) {
        self.parallax
            .pointer_moved(x, y, bounds, self.state.current_index);
    }

    /// Apply a named depth preset. Unknown names change nothing.
    pub fn apply_preset(&mut self, name: &str) -> bool {
        self.presets
            .apply(name, &mut self.parallax, self.state.current_index)
    }

    pub fn set_blur(&mut self, slot: BlurSlot, radius: f32) {
        self.presets.set_blur(slot, radius);
    }

    /// Tickets issued since the last call, for the renderer to hold.
    pub fn take_tickets(&mut self) -> Vec<CompletionTicket> {
        std::mem::take(&mut self.tickets)
    }

    pub fn complete_transition(&mut self, ticket: CompletionTicket) {
        self.animator.complete(ticket, self.state.current_index);
    }

    pub fn counter_text(&self) -> String {
        format!("{} / {}", self.state.current_index + 1, self.slides.len())
    }

    pub fn progress(&self) -> f32 {
        self.state.progress(self.slides.len())
    }

    /// Progress bar width, e.g. `"50%"`.
    pub fn progress_width(&self) -> String {
        percent(self.progress())
    }

    pub fn glow(&self) -> Glow {
        Glow::for_slide(self.state.current_index, self.slides.len())
    }

    pub fn slide_view(&self, index: usize) -> Option<SlideView> {
        let markers = *self.animator.marker(index)?;
        let offset = index as isize - self.state.current_index as isize;
        Some(SlideView {
            index,
            markers,
            offset,
            far: offset.abs() > 1,
            depth: self.slides[index].depth.unwrap_or(1.0),
        })
    }

    /// Active flag of every navigation dot.
    pub fn dots(&self) -> Vec<bool> {
        (0..self.slides.len())
            .map(|i| i == self.state.current_index)
            .collect()
    }

    pub fn style_vars(&self) -> StyleVars {
        let mut vars = StyleVars::default();
        for slot in BlurSlot::ALL {
            vars.set_px(slot.var_name(), self.presets.blur(slot));
        }

        let glow = self.glow();
        vars.set_percent("--glow-x", glow.x);
        vars.set_percent("--glow-y", glow.y);
        vars.set("--glow-strength", glow.strength.to_string());

        let layers = self.parallax.layers();
        for (position, (layer, offset)) in layers.iter().zip(self.parallax.offsets()).enumerate() {
            let slot = BlurSlot::for_layer(position, layers.len());
            vars.set_px(format!("--blur-{}", layer.name), self.presets.blur(slot));
            vars.set(format!("--layer-{}-transform", layer.name), offset.transform());
        }
        vars.set("--progress", self.progress_width());
        vars
    }
}
