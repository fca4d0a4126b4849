use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    pub panel_background: Color32,
    pub glow: Color32,
    /// Fill for each parallax layer, back to front. Decks with more layers
    /// cycle through the list.
    pub layer_colors: Vec<Color32>,
    pub h1_size: f32,
    pub body_size: f32,
    pub notes_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x0B, 0x0E, 0x1A),
            foreground: Color32::from_rgb(0xC8, 0xCC, 0xDA),
            heading_color: Color32::WHITE,
            accent: Color32::from_rgb(0x52, 0x94, 0xE2),
            panel_background: Color32::from_rgb(0x16, 0x1A, 0x2B),
            glow: Color32::from_rgb(0x7A, 0x9C, 0xFF),
            layer_colors: vec![
                Color32::from_rgb(0x1B, 0x22, 0x44),
                Color32::from_rgb(0x26, 0x2F, 0x5C),
                Color32::from_rgb(0x34, 0x3F, 0x78),
                Color32::from_rgb(0x45, 0x52, 0x96),
            ],
            h1_size: 72.0,
            body_size: 36.0,
            notes_size: 18.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::from_rgb(0xF4, 0xF5, 0xFA),
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            heading_color: Color32::from_rgb(0x16, 0x21, 0x3E),
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            panel_background: Color32::from_rgb(0xE6, 0xE8, 0xF0),
            glow: Color32::from_rgb(0xFF, 0xD9, 0x9A),
            layer_colors: vec![
                Color32::from_rgb(0xDD, 0xE3, 0xF2),
                Color32::from_rgb(0xC9, 0xD2, 0xEA),
                Color32::from_rgb(0xB3, 0xBF, 0xE0),
                Color32::from_rgb(0x9D, 0xAC, 0xD6),
            ],
            h1_size: 72.0,
            body_size: 36.0,
            notes_size: 18.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0) as u8;
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
    }

    pub fn layer_color(&self, layer: usize) -> Color32 {
        if self.layer_colors.is_empty() {
            return self.background;
        }
        self.layer_colors[layer % self.layer_colors.len()]
    }

    /// Opacity of a layer drawn with `blur` px of blur. egui has no blur
    /// filter, so softer layers are drawn fainter instead.
    pub fn blur_opacity(blur: f32) -> f32 {
        1.0 / (1.0 + blur.max(0.0) * 0.25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_defaults_to_dark() {
        assert_eq!(Theme::from_name("light").name, "light");
        assert_eq!(Theme::from_name("sepia").name, "dark");
        assert_eq!(Theme::dark().toggled().name, "light");
    }

    #[test]
    fn test_layer_colors_cycle() {
        let theme = Theme::dark();
        assert_eq!(theme.layer_color(5), theme.layer_colors[1]);
    }

    #[test]
    fn test_blur_opacity_decreases() {
        assert_eq!(Theme::blur_opacity(0.0), 1.0);
        assert!(Theme::blur_opacity(4.0) < Theme::blur_opacity(1.0));
        assert_eq!(Theme::blur_opacity(-2.0), 1.0);
    }

    #[test]
    fn test_with_opacity() {
        let c = Theme::with_opacity(Color32::from_rgb(10, 20, 30), 0.5);
        assert_eq!(c.a(), 127);
    }
}
