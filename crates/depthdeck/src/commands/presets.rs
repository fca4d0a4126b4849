use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::config::Config;
use crate::deck::DeckOptions;
use crate::deck::preset::{BlurSlot, DEFAULT_PRESET, DepthPreset};
use crate::parser::{self, DeckMeta};

pub fn run(file: Option<&Path>) -> Result<()> {
    let meta = match file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parser::parse(&content).meta
        }
        None => DeckMeta::default(),
    };
    let config = Config::load_or_default();
    let options = DeckOptions::resolve(&meta, &config, None);

    println!("{}", "Depth presets".bold());
    for (position, (name, preset)) in options.presets.iter().enumerate() {
        let active = name == options.preset;
        let marker = if active { "*".green().bold() } else { " ".normal() };
        let hotkey = match position {
            0..=2 => format!("[{}]", position + 1),
            _ => "   ".to_string(),
        };
        let label = format!("{name:<12}");
        let label = if active { label.green().bold() } else { label.normal() };
        println!(
            "  {marker} {} {label} {}",
            hotkey.dimmed(),
            describe(preset)
        );
    }
    if options.presets.get(&options.preset).is_none() {
        println!(
            "\n{} default preset '{}' is not defined, '{DEFAULT_PRESET}' will be used",
            "warning:".yellow().bold(),
            options.preset
        );
    }
    Ok(())
}

fn describe(preset: &DepthPreset) -> String {
    let blur: Vec<String> = BlurSlot::ALL
        .iter()
        .zip(preset.blur)
        .map(|(slot, radius)| format!("{}={radius}", slot.name()))
        .collect();
    format!(
        "strength {}x{}  blur {}",
        preset.strength_x,
        preset.strength_y,
        blur.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let text = describe(&DepthPreset::new(60.0, 32.0, [4.0, 4.5, 2.2, 0.4]));
        assert_eq!(text, "strength 60x32  blur bg1=4 layer3=4.5 layer2=2.2 main=0.4");
    }
}
