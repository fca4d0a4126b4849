use std::f32::consts::PI;

/// Radial highlight that drifts across the background as the deck advances.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Glow {
    /// Horizontal centre, percent of the deck width.
    pub x: f32,
    /// Vertical centre, percent of the deck height.
    pub y: f32,
    pub strength: f32,
}

impl Glow {
    /// Glow for a progress ratio `t` in `[0, 1]`.
    pub fn at_progress(t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            x: 25.0 + 50.0 * t,
            y: 25.0 + 20.0 * (1.0 - t),
            strength: 0.35 + 0.25 * (t * PI).sin(),
        }
    }

    pub fn for_slide(index: usize, slide_count: usize) -> Self {
        let last = slide_count.saturating_sub(1).max(1);
        Self::at_progress(index as f32 / last as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_glow_at_start() {
        let glow = Glow::at_progress(0.0);
        assert!(close(glow.x, 25.0));
        assert!(close(glow.y, 45.0));
        assert!(close(glow.strength, 0.35));
    }

    #[test]
    fn test_glow_at_end() {
        let glow = Glow::at_progress(1.0);
        assert!(close(glow.x, 75.0));
        assert!(close(glow.y, 25.0));
        assert!(close(glow.strength, 0.35));
    }

    #[test]
    fn test_glow_peaks_midway() {
        let glow = Glow::at_progress(0.5);
        assert!(close(glow.strength, 0.6));
        assert!(close(glow.x, 50.0));
        assert!(close(glow.y, 35.0));
    }

    #[test]
    fn test_single_slide_deck() {
        assert_eq!(Glow::for_slide(0, 1), Glow::at_progress(0.0));
    }

    #[test]
    fn test_for_slide_uses_last_index() {
        assert_eq!(Glow::for_slide(4, 5), Glow::at_progress(1.0));
    }
}
