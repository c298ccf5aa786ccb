//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for majordomo
#[derive(Parser, Debug)]
#[command(name = "majordomo")]
#[command(author, version, about = "Majordomo - a household assistant that delegates to specialists")]
#[command(long_about = r#"
Majordomo coordinates a roster of specialists (recipes, pantry, dietary
advice, household tasks, persona) behind a single conversational surface.
Each request is classified, answered directly or delegated to exactly one
specialist, and the reply always comes back as one message.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./majordomo.toml    Project-level config
3. ~/.config/majordomo/config.toml   Global config

Example:
  majordomo "find me a recipe for chicken stir-fry"
  majordomo --session kitchen-1 "save that recipe"
  majordomo --chat
"#)]
pub struct Cli {
    /// The request to handle (not required in chat mode)
    pub query: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Session id to continue; a new session is created when omitted
    #[arg(short, long, value_name = "ID")]
    pub session: Option<String>,

    /// Print the structured payload after each reply
    #[arg(long)]
    pub show_data: bool,

    /// Write a JSONL conversation transcript to this path
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
