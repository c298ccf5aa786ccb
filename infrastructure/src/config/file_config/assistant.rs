//! Assistant configuration from TOML (`[assistant]` section)

use serde::{Deserialize, Serialize};

/// Raw assistant configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAssistantConfig {
    /// Name the assistant introduces itself with
    pub name: String,
    /// Chat turns kept per session before the oldest are dropped (0 keeps all)
    pub history_limit: usize,
}

impl Default for FileAssistantConfig {
    fn default() -> Self {
        Self {
            name: "Majordomo".to_string(),
            history_limit: 50,
        }
    }
}
