use std::collections::BTreeMap;

/// Named visual parameters handed to the presentation layer.
///
/// Keys follow custom-property naming (`--glow-x`); values are rendered
/// strings with their unit (`42.5%`, `3px`).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct StyleVars {
    vars: BTreeMap<String, String>,
}

impl StyleVars {
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn set_px(&mut self, name: impl Into<String>, value: f32) {
        self.set(name, format!("{value}px"));
    }

    pub fn set_percent(&mut self, name: impl Into<String>, value: f32) {
        self.set(name, format!("{value}%"));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Numeric part of a value, without its unit.
    pub fn number(&self, name: &str) -> Option<f32> {
        let raw = self.get(name)?;
        raw.trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%')
            .parse()
            .ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Format a fraction in `[0, 1]` as a CSS width.
pub fn percent(fraction: f32) -> String {
    format!("{}%", (fraction.clamp(0.0, 1.0) * 100.0).round())
}
