use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();
    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();
    println!("{}", render(&config)?);
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {} = {} ({})",
        "Saved".green().bold(),
        key,
        value,
        path.display()
    );
    Ok(())
}

/// YAML for display. An empty config renders as the effective defaults.
fn render(config: &Config) -> Result<String> {
    if *config == Config::default() {
        return Ok(format!(
            "defaults:\n  theme: dark\n  preset: {}\n  start_mode: first\n  slide_shift: {}\n",
            crate::deck::preset::DEFAULT_PRESET,
            crate::deck::parallax::DEFAULT_SLIDE_SHIFT
        ));
    }
    Ok(serde_yaml::to_string(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_defaults() {
        let text = render(&Config::default()).unwrap();
        assert!(text.contains("preset: deep"));
        assert!(text.contains("slide_shift: 140"));
    }

    #[test]
    fn test_render_custom() {
        let mut config = Config::default();
        config.set("defaults.theme", "light").unwrap();
        let text = render(&config).unwrap();
        assert!(text.contains("theme: light"));
        assert!(!text.contains("preset"));
    }
}
