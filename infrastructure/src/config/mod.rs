//! Configuration file loading for majordomo
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./majordomo.toml` or `./.majordomo.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/majordomo/config.toml`
//! 4. Fallback: `~/.config/majordomo/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAssistantConfig, FileConfig, FileLoggingConfig, FileOutputConfig, FileReplConfig,
};
pub use loader::ConfigLoader;
