use eframe::egui;
use std::time::Instant;

use crate::config::Config;
use crate::deck::Deck;
use crate::deck::parallax::PointerBox;
use crate::deck::preset::BlurSlot;
use crate::deck::style::StyleVars;
use crate::deck::transition::{CompletionTicket, Phase};
use crate::deck::state::Direction;
use crate::input::{DeckInput, DeckKey, InputRouter, key_from_name};
use crate::parser::Slide;
use crate::session::{Session, StartOptions};
use crate::theme::Theme;

const TRANSITION_DURATION: f32 = 0.45;
/// Fraction of the slide width a slide travels while entering or leaving.
const TRANSITION_TRAVEL: f32 = 0.3;
const BLOBS_PER_LAYER: usize = 7;

/// Keys the deck reacts to, with their DOM-style names.
const DECK_KEYS: [(egui::Key, &str); 12] = [
    (egui::Key::ArrowRight, "ArrowRight"),
    (egui::Key::ArrowLeft, "ArrowLeft"),
    (egui::Key::PageDown, "PageDown"),
    (egui::Key::PageUp, "PageUp"),
    (egui::Key::Space, " "),
    (egui::Key::Home, "Home"),
    (egui::Key::End, "End"),
    (egui::Key::O, "o"),
    (egui::Key::N, "n"),
    (egui::Key::Num1, "1"),
    (egui::Key::Num2, "2"),
    (egui::Key::Num3, "3"),
];

/// A running slide animation, waiting to hand its ticket back.
struct Animation {
    ticket: CompletionTicket,
    start: Instant,
}

impl Animation {
    fn progress(&self) -> f32 {
        (self.start.elapsed().as_secs_f32() / TRANSITION_DURATION).min(1.0)
    }
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: String) -> Self {
        Self {
            message,
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        if elapsed < 1.0 {
            1.0
        } else {
            (1.0 - (elapsed - 1.0) / 0.5).max(0.0)
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= 1.5
    }
}

struct DeckApp {
    deck: Deck,
    router: InputRouter,
    theme: Theme,
    title: String,
    animations: Vec<Animation>,
    /// Deck area from the last frame; pointer positions are measured against it.
    deck_rect: egui::Rect,
    last_pointer: Option<egui::Pos2>,
    last_fragment: String,
    show_blur_panel: bool,
    toast: Option<Toast>,
    last_esc: Option<Instant>,
}

impl DeckApp {
    fn new(deck: Deck, theme: Theme, title: String) -> Self {
        let last_fragment = deck.fragment().to_string();
        Self {
            deck,
            router: InputRouter::new(),
            theme,
            title,
            animations: Vec::new(),
            deck_rect: egui::Rect::NOTHING,
            last_pointer: None,
            last_fragment,
            show_blur_panel: false,
            toast: None,
            last_esc: None,
        }
    }

    /// Route `inputs` into the deck. Returns `true` when the user asked to quit.
    fn apply(&mut self, inputs: Vec<DeckInput>) -> bool {
        let mut quit = false;
        for input in inputs {
            let escape = input == DeckInput::Key(DeckKey::Escape);
            if !self.router.handle(&mut self.deck, input) && escape {
                quit |= self.escape_pressed();
            }
        }
        let now = Instant::now();
        self.animations.extend(
            self.deck
                .take_tickets()
                .into_iter()
                .map(|ticket| Animation { ticket, start: now }),
        );
        quit
    }

    /// Escape that the deck did not consume. A second press within a second quits.
    fn escape_pressed(&mut self) -> bool {
        if self
            .last_esc
            .is_some_and(|last| last.elapsed().as_secs_f32() < 1.0)
        {
            return true;
        }
        self.last_esc = Some(Instant::now());
        self.toast = Some(Toast::new("Press Esc again to exit".to_string()));
        false
    }

    /// Hand back every ticket whose animation has finished.
    fn finish_animations(&mut self) {
        let (done, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.animations)
            .into_iter()
            .partition(|a| a.progress() >= 1.0);
        self.animations = running;
        for animation in done {
            self.deck.complete_transition(animation.ticket);
        }
    }

    fn slide_progress(&self, index: usize) -> f32 {
        self.animations
            .iter()
            .rev()
            .find(|a| a.ticket.slide() == index)
            .map_or(1.0, Animation::progress)
    }

    fn collect_input(&mut self, ctx: &egui::Context) -> (Vec<DeckInput>, Vec<egui::ViewportCommand>) {
        let mut inputs = Vec::new();
        let mut viewport_cmds = Vec::new();
        let bounds = PointerBox::new(
            self.deck_rect.left(),
            self.deck_rect.top(),
            self.deck_rect.width(),
            self.deck_rect.height(),
        );

        ctx.input(|i| {
            if i.key_pressed(egui::Key::Q) {
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }
            if i.key_pressed(egui::Key::F) {
                viewport_cmds.push(egui::ViewportCommand::Fullscreen(
                    !i.viewport().fullscreen.unwrap_or(false),
                ));
            }
            if i.key_pressed(egui::Key::D) {
                self.theme = self.theme.toggled();
                self.toast = Some(Toast::new(format!("Theme: {}", self.theme.name)));
            }
            if i.key_pressed(egui::Key::B) {
                self.show_blur_panel = !self.show_blur_panel;
            }
            if i.key_pressed(egui::Key::Escape) {
                inputs.push(DeckInput::Key(DeckKey::Escape));
            }
            let pressed = DECK_KEYS
                .iter()
                .filter(|(key, _)| i.key_pressed(*key))
                .filter_map(|(_, name)| key_from_name(name, i.modifiers.alt));
            inputs.extend(pressed.map(DeckInput::Key));

            let pointer = i.pointer.hover_pos();
            if pointer.is_some() && pointer != self.last_pointer {
                self.last_pointer = pointer;
                if let Some(pos) = pointer {
                    inputs.push(DeckInput::PointerMoved {
                        x: pos.x,
                        y: pos.y,
                        bounds,
                    });
                }
            }
            if let Some(pos) = i.pointer.interact_pos() {
                if i.pointer.primary_pressed() {
                    inputs.push(DeckInput::PointerPressed { x: pos.x });
                }
                if i.pointer.primary_released() {
                    inputs.push(DeckInput::PointerReleased { x: pos.x });
                }
            }
        });
        (inputs, viewport_cmds)
    }
}

impl eframe::App for DeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Viewport commands go out after the input closure to avoid a lock
        // deadlock inside ctx.input().
        let (inputs, viewport_cmds) = self.collect_input(ctx);
        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }
        if self.apply(inputs) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        self.finish_animations();

        if self.deck.fragment() != self.last_fragment {
            self.last_fragment = self.deck.fragment().to_string();
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
                "{} {}",
                self.title, self.last_fragment
            )));
        }
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }

        let mut clicks = Vec::new();

        if self.deck.state().notes_visible {
            egui::SidePanel::right("notes_panel")
                .resizable(true)
                .default_width(340.0)
                .frame(egui::Frame::new().fill(self.theme.panel_background).inner_margin(16.0))
                .show(ctx, |ui| {
                    self.draw_notes(ui, &mut clicks);
                });
        }

        if self.show_blur_panel {
            self.draw_blur_panel(ctx);
        }

        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.deck_rect = rect;
                ui.painter().rect_filled(rect, 0.0, bg);
                let scale = compute_scale(rect);
                let vars = self.deck.style_vars();

                self.draw_layers(ui, rect, scale, &vars);
                self.draw_glow(ui, rect, scale, &vars);
                if self.deck.state().overview {
                    self.draw_overview(ui, rect, scale, &mut clicks);
                } else {
                    self.draw_slides(ui, rect, scale);
                }
                self.draw_chrome(ui, rect, scale, &vars, &mut clicks);
                self.draw_toast(ui, rect, scale);
            });

        if self.apply(clicks) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if !self.animations.is_empty() || self.toast.is_some() {
            ctx.request_repaint();
        }
    }
}

impl DeckApp {
    fn draw_layers(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32, vars: &StyleVars) {
        let parallax = self.deck.parallax();
        let margin = 160.0 * scale;
        for (i, (layer, offset)) in parallax
            .layers()
            .iter()
            .zip(parallax.offsets())
            .enumerate()
        {
            let blur = vars
                .number(&format!("--blur-{}", layer.name))
                .unwrap_or(0.0);
            let color = Theme::with_opacity(
                self.theme.layer_color(i),
                0.55 * Theme::blur_opacity(blur),
            );
            let radius = (36.0 + 90.0 * layer.depth_factor) * scale;
            for k in 0..BLOBS_PER_LAYER {
                let seed_x = ((k * 37 + i * 17) % 100) as f32 / 100.0;
                let seed_y = ((k * 53 + i * 29) % 100) as f32 / 100.0;
                let x = wrap(
                    rect.left() + seed_x * rect.width() + offset.x * scale,
                    rect.left() - margin,
                    rect.width() + margin * 2.0,
                );
                let y = rect.top() + seed_y * rect.height() + offset.y * scale;
                // Blurred layers get a soft halo instead of a real blur.
                if blur > 0.0 {
                    ui.painter().circle_filled(
                        egui::pos2(x, y),
                        radius + blur * 2.0 * scale,
                        Theme::with_opacity(color, 0.35),
                    );
                }
                ui.painter().circle_filled(egui::pos2(x, y), radius, color);
            }
        }
    }

    fn draw_glow(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32, vars: &StyleVars) {
        let x = vars.number("--glow-x").unwrap_or(50.0) / 100.0;
        let y = vars.number("--glow-y").unwrap_or(50.0) / 100.0;
        let strength = vars.number("--glow-strength").unwrap_or(0.0);
        let center = egui::pos2(
            rect.left() + rect.width() * x,
            rect.top() + rect.height() * y,
        );
        let rings = 12;
        let max_radius = 420.0 * scale;
        for ring in 0..rings {
            let t = ring as f32 / rings as f32;
            let alpha = strength * 0.12 * (1.0 - t);
            ui.painter().circle_filled(
                center,
                max_radius * (1.0 - t),
                Theme::with_opacity(self.theme.glow, alpha),
            );
        }
    }

    fn draw_slides(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) {
        let (pointer_x, pointer_y) = self.deck.parallax().last_pointer();
        let (strength_x, strength_y) = self.deck.parallax().strengths();
        for (index, slide) in self.deck.slides().iter().enumerate() {
            let Some(view) = self.deck.slide_view(index) else {
                continue;
            };
            if !view.markers.active {
                continue;
            }
            let eased = ease_in_out(self.slide_progress(index));
            let travel = rect.width() * TRANSITION_TRAVEL;
            let (dx, opacity) = match view.markers.phase {
                Phase::Idle => (0.0, 1.0),
                Phase::Entering(dir) => (direction_sign(dir) * travel * (1.0 - eased), eased),
                Phase::Exiting(dir) => (-direction_sign(dir) * travel * eased, 1.0 - eased),
            };
            let float = egui::vec2(
                pointer_x * strength_x * view.depth * 0.25,
                pointer_y * strength_y * view.depth * 0.25,
            ) * scale;
            let slide_rect = rect.translate(egui::vec2(dx, 0.0) + float);
            draw_slide(ui, slide, &self.theme, slide_rect, opacity, scale);
        }
    }

    fn draw_overview(
        &self,
        ui: &egui::Ui,
        rect: egui::Rect,
        scale: f32,
        clicks: &mut Vec<DeckInput>,
    ) {
        let count = self.deck.slide_count();
        let cols = grid_columns(count);
        let rows = count.div_ceil(cols);
        let padding = 24.0 * scale;
        let area = rect.shrink(padding * 2.0);
        let cell_w = (area.width() - padding * (cols as f32 - 1.0)) / cols as f32;
        let cell_h = ((area.height() - padding * (rows as f32 - 1.0)) / rows as f32)
            .min(cell_w * 9.0 / 16.0);
        let current = self.deck.current_index();

        for (index, slide) in self.deck.slides().iter().enumerate() {
            let col = index % cols;
            let row = index / cols;
            let cell = egui::Rect::from_min_size(
                egui::pos2(
                    area.left() + col as f32 * (cell_w + padding),
                    area.top() + row as f32 * (cell_h + padding),
                ),
                egui::vec2(cell_w, cell_h),
            );
            let response = ui.interact(cell, egui::Id::new(("overview_cell", index)), egui::Sense::click());
            let fill = if response.hovered() {
                Theme::with_opacity(self.theme.panel_background, 0.95)
            } else {
                Theme::with_opacity(self.theme.panel_background, 0.8)
            };
            ui.painter().rect_filled(cell, 8.0 * scale, fill);
            if index == current {
                ui.painter().rect_stroke(
                    cell,
                    8.0 * scale,
                    egui::Stroke::new(3.0 * scale, self.theme.accent),
                    egui::StrokeKind::Outside,
                );
            }
            let number = ui.painter().layout_no_wrap(
                format!("{}", index + 1),
                egui::FontId::proportional(14.0 * scale),
                Theme::with_opacity(self.theme.foreground, 0.6),
            );
            ui.painter().galley(
                cell.left_top() + egui::vec2(10.0 * scale, 8.0 * scale),
                number,
                self.theme.foreground,
            );
            let title = ui.painter().layout(
                slide.title.clone(),
                egui::FontId::proportional(22.0 * scale),
                self.theme.heading_color,
                cell.width() - 20.0 * scale,
            );
            let pos = cell.center() - title.rect.size() / 2.0;
            ui.painter().galley(pos, title, self.theme.heading_color);

            if response.clicked() {
                clicks.push(DeckInput::CellClicked(index));
            }
        }
    }

    fn draw_chrome(
        &self,
        ui: &egui::Ui,
        rect: egui::Rect,
        scale: f32,
        vars: &StyleVars,
        clicks: &mut Vec<DeckInput>,
    ) {
        // Progress bar
        let progress = vars.number("--progress").unwrap_or(0.0) / 100.0;
        let bar = egui::Rect::from_min_size(
            egui::pos2(rect.left(), rect.bottom() - 4.0 * scale),
            egui::vec2(rect.width() * progress, 4.0 * scale),
        );
        ui.painter().rect_filled(bar, 0.0, self.theme.accent);

        // Counter with prev/next buttons
        let counter_color = Theme::with_opacity(self.theme.foreground, 0.6);
        let font = egui::FontId::proportional(16.0 * scale);
        let counter = ui.painter().layout_no_wrap(self.deck.counter_text(), font.clone(), counter_color);
        let counter_pos = egui::pos2(
            rect.right() - counter.rect.width() - 56.0 * scale,
            rect.bottom() - 36.0 * scale,
        );
        let counter_w = counter.rect.width();
        ui.painter().galley(counter_pos, counter, counter_color);
        let buttons = [
            ("\u{2039}", counter_pos.x - 28.0 * scale, DeckInput::PrevClicked),
            ("\u{203A}", counter_pos.x + counter_w + 12.0 * scale, DeckInput::NextClicked),
        ];
        for (label, x, input) in buttons {
            let button = egui::Rect::from_min_size(
                egui::pos2(x, counter_pos.y - 4.0 * scale),
                egui::vec2(20.0 * scale, 26.0 * scale),
            );
            let response = ui.interact(button, egui::Id::new(("nav_button", label)), egui::Sense::click());
            let color = if response.hovered() {
                self.theme.accent
            } else {
                counter_color
            };
            let galley = ui.painter().layout_no_wrap(label.to_string(), font.clone(), color);
            ui.painter().galley(button.left_top(), galley, color);
            if response.clicked() {
                clicks.push(input);
            }
        }

        // Dots
        let dots = self.deck.dots();
        let spacing = 16.0 * scale;
        let start_x = rect.center().x - spacing * (dots.len() as f32 - 1.0) / 2.0;
        let dot_y = rect.bottom() - 24.0 * scale;
        for (index, active) in dots.into_iter().enumerate() {
            let center = egui::pos2(start_x + index as f32 * spacing, dot_y);
            let hit = egui::Rect::from_center_size(center, egui::vec2(spacing, spacing));
            let response = ui.interact(hit, egui::Id::new(("dot", index)), egui::Sense::click());
            let (radius, color) = if active {
                (5.0 * scale, self.theme.accent)
            } else {
                (3.5 * scale, Theme::with_opacity(self.theme.foreground, 0.35))
            };
            ui.painter().circle_filled(center, radius, color);
            if response.clicked() {
                clicks.push(DeckInput::DotClicked(index));
            }
        }

        // Preset buttons
        let mut x = rect.right() - 16.0 * scale;
        let indicators = self.deck.presets().indicators();
        for (position, (name, active)) in indicators.iter().enumerate().rev() {
            let color = if *active {
                self.theme.accent
            } else {
                Theme::with_opacity(self.theme.foreground, 0.5)
            };
            let galley = ui.painter().layout_no_wrap(name.to_string(), font.clone(), color);
            let size = galley.rect.size() + egui::vec2(16.0, 8.0) * scale;
            x -= size.x;
            let button = egui::Rect::from_min_size(egui::pos2(x, rect.top() + 16.0 * scale), size);
            x -= 8.0 * scale;
            let response = ui.interact(button, egui::Id::new(("preset", position)), egui::Sense::click());
            ui.painter().rect_stroke(
                button,
                6.0 * scale,
                egui::Stroke::new(1.0, color),
                egui::StrokeKind::Inside,
            );
            ui.painter()
                .galley(button.left_top() + egui::vec2(8.0, 4.0) * scale, galley, color);
            if response.clicked() {
                clicks.push(DeckInput::Key(DeckKey::Preset(position)));
            }
        }
    }

    fn draw_notes(&self, ui: &mut egui::Ui, clicks: &mut Vec<DeckInput>) {
        ui.horizontal(|ui| {
            ui.heading(egui::RichText::new("Notes").color(self.theme.heading_color));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("\u{00d7}").clicked() {
                    clicks.push(DeckInput::Key(DeckKey::Escape));
                }
            });
        });
        ui.label(
            egui::RichText::new(&self.deck.current_slide().title)
                .color(Theme::with_opacity(self.theme.foreground, 0.6)),
        );
        ui.separator();
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.label(
                egui::RichText::new(self.deck.notes().text())
                    .size(self.theme.notes_size)
                    .color(self.theme.foreground),
            );
        });
    }

    fn draw_blur_panel(&mut self, ctx: &egui::Context) {
        let mut open = self.show_blur_panel;
        let mut changes = Vec::new();
        egui::Window::new("Blur")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                for slot in BlurSlot::ALL {
                    let mut radius = self.deck.presets().blur(slot);
                    let slider = egui::Slider::new(&mut radius, 0.0..=12.0)
                        .text(slot.name())
                        .suffix(" px");
                    if ui.add(slider).changed() {
                        changes.push((slot, radius));
                    }
                }
            });
        self.show_blur_panel = open;
        for (slot, radius) in changes {
            self.deck.set_blur(slot, radius);
        }
    }

    fn draw_toast(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) {
        let Some(ref toast) = self.toast else {
            return;
        };
        let opacity = toast.opacity();
        if opacity <= 0.0 {
            return;
        }
        let color = Theme::with_opacity(self.theme.foreground, opacity * 0.9);
        let bg = Theme::with_opacity(self.theme.panel_background, opacity * 0.9);
        let galley = ui.painter().layout_no_wrap(
            toast.message.clone(),
            egui::FontId::proportional(20.0 * scale),
            color,
        );
        let padding = 16.0 * scale;
        let toast_rect = egui::Rect::from_min_size(
            egui::pos2(
                rect.center().x - galley.rect.width() / 2.0 - padding,
                rect.bottom() - 100.0 * scale,
            ),
            galley.rect.size() + egui::vec2(padding, padding) * 2.0,
        );
        ui.painter().rect_filled(toast_rect, 8.0 * scale, bg);
        ui.painter()
            .galley(toast_rect.min + egui::vec2(padding, padding), galley, color);
    }
}

fn draw_slide(ui: &egui::Ui, slide: &Slide, theme: &Theme, rect: egui::Rect, opacity: f32, scale: f32) {
    if opacity <= 0.0 {
        return;
    }
    let margin = 96.0 * scale;
    let width = (rect.width() - margin * 2.0).max(1.0);
    let heading_color = Theme::with_opacity(theme.heading_color, opacity);
    let body_color = Theme::with_opacity(theme.foreground, opacity);

    let title = ui.painter().layout(
        slide.title.clone(),
        egui::FontId::proportional(theme.h1_size * scale),
        heading_color,
        width,
    );
    let body = ui.painter().layout(
        slide.body.join("\n"),
        egui::FontId::proportional(theme.body_size * scale),
        body_color,
        width,
    );
    let gap = 32.0 * scale;
    let total = title.rect.height() + gap + body.rect.height();
    let top = rect.center().y - total / 2.0;
    let title_h = title.rect.height();
    ui.painter()
        .galley(egui::pos2(rect.left() + margin, top), title, heading_color);
    ui.painter().galley(
        egui::pos2(rect.left() + margin, top + title_h + gap),
        body,
        body_color,
    );
}

fn direction_sign(direction: Direction) -> f32 {
    match direction {
        Direction::Forward => 1.0,
        Direction::Backward => -1.0,
    }
}

fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

fn compute_scale(rect: egui::Rect) -> f32 {
    (rect.width() / 1280.0).min(rect.height() / 720.0).max(0.1)
}

fn grid_columns(count: usize) -> usize {
    ((count as f32).sqrt().ceil() as usize).clamp(1, 6)
}

/// Wrap `x` into `[start, start + span)`.
fn wrap(x: f32, start: f32, span: f32) -> f32 {
    if span <= 0.0 {
        return x;
    }
    start + (x - start).rem_euclid(span)
}

pub fn run(target: &str, windowed: bool, start: &StartOptions) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let session = Session::open(target, start, &config)?;
    let title = session.title();
    let theme = Theme::from_name(&session.theme);
    let deck = session.into_deck()?;
    tracing::info!(slides = deck.slide_count(), start = %deck.fragment(), "presenting");

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let app_title = title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(DeckApp::new(deck, theme, app_title)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
