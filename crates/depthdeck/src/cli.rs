use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::session::StartOptions;

#[derive(Parser)]
#[command(name = "depthdeck")]
#[command(author, version, about)]
#[command(long_about = "A markdown slide presenter with a layered parallax background.\n\n\
    Slides float over depth layers that follow the pointer and drift as the\n\
    deck advances.\n\n\
    Examples:\n  \
    depthdeck talk.md                Present fullscreen from the first slide\n  \
    depthdeck talk.md#4 --windowed   Open slide 4 in a window\n  \
    depthdeck talk.md --preset subtle\n  \
    depthdeck inspect talk.md#2      Print the derived deck state")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Markdown file to present, optionally with a slide anchor (talk.md#3)
    pub file: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Start in grid overview mode
    #[arg(long, global = false)]
    pub overview: bool,

    /// Depth preset to start with (subtle, medium, deep or a configured one)
    #[arg(long, global = false)]
    pub preset: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// List depth presets
    Presets {
        /// Include presets defined in this deck's frontmatter
        file: Option<PathBuf>,
    },

    /// Print the derived state of a deck without opening a window
    Inspect {
        /// Markdown file, optionally with a slide anchor (talk.md#3)
        file: String,

        /// Start on a specific slide (1-indexed)
        #[arg(long)]
        slide: Option<usize>,

        /// Depth preset to apply
        #[arg(long)]
        preset: Option<String>,

        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, defaults.preset, defaults.start_mode)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Presets { file }) => crate::commands::presets::run(file.as_deref()),
            Some(Commands::Inspect {
                file,
                slide,
                preset,
                json,
            }) => {
                let start = StartOptions {
                    slide,
                    overview: false,
                    preset,
                };
                crate::commands::inspect::run(&file, &start, json)
            }
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("depthdeck {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if let Some(file) = self.file {
                    let start = StartOptions {
                        slide: self.slide,
                        overview: self.overview,
                        preset: self.preset,
                    };
                    crate::app::run(&file, self.windowed, &start)
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_present_flags() {
        let cli = Cli::try_parse_from([
            "depthdeck",
            "talk.md#3",
            "--windowed",
            "--preset",
            "subtle",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.file.as_deref(), Some("talk.md#3"));
        assert!(cli.windowed);
        assert_eq!(cli.preset.as_deref(), Some("subtle"));
        assert_eq!(cli.verbose, 2);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_inspect() {
        let cli = Cli::try_parse_from(["depthdeck", "inspect", "talk.md", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Inspect { file, json, .. }) => {
                assert_eq!(file, "talk.md");
                assert!(json);
            }
            _ => panic!("expected inspect"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
