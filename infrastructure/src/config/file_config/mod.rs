//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types.

mod assistant;
mod logging;
mod output;
mod repl;

pub use assistant::FileAssistantConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use repl::FileReplConfig;

use majordomo_application::BehaviorConfig;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Assistant identity and behavior
    pub assistant: FileAssistantConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Logging settings
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration, returning human-readable warnings.
    ///
    /// Nothing here is fatal: an odd value falls back to a default and
    /// the warning tells the user which one.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.assistant.name.trim().is_empty() {
            warnings.push(
                "assistant.name is empty, falling back to 'Majordomo'".to_string(),
            );
        }
        if self.assistant.history_limit == 0 {
            warnings.push(
                "assistant.history_limit is 0, chat history will grow without bound".to_string(),
            );
        }
        warnings
    }

    /// Behavior settings for the use-case layer.
    pub fn to_behavior(&self) -> BehaviorConfig {
        let name = if self.assistant.name.trim().is_empty() {
            "Majordomo".to_string()
        } else {
            self.assistant.name.clone()
        };
        BehaviorConfig::default()
            .with_assistant_name(name)
            .with_history_limit(self.assistant.history_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[assistant]
name = "Jeeves"
history_limit = 10

[repl]
show_data = true
history_file = "~/.local/share/majordomo/history.txt"

[logging]
conversation_log = "majordomo.conversation.jsonl"

[output]
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.assistant.name, "Jeeves");
        assert_eq!(config.assistant.history_limit, 10);
        assert!(config.repl.show_data);
        assert_eq!(
            config.logging.conversation_log.as_deref(),
            Some("majordomo.conversation.jsonl")
        );
        assert!(!config.output.color);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[assistant]
name = "Jeeves"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.assistant.name, "Jeeves");
        // Defaults should apply
        assert_eq!(config.assistant.history_limit, 50);
        assert!(!config.repl.show_data);
        assert!(config.output.color);
        assert!(config.logging.conversation_log.is_none());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.assistant.name, "Majordomo");
        assert_eq!(config.assistant.history_limit, 50);
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_flags_empty_name() {
        let mut config = FileConfig::default();
        config.assistant.name = "  ".to_string();
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("assistant.name"));
        // The converted behavior falls back rather than carrying the blank
        assert_eq!(config.to_behavior().assistant_name, "Majordomo");
    }

    #[test]
    fn test_to_behavior_carries_settings() {
        let mut config = FileConfig::default();
        config.assistant.name = "Jeeves".to_string();
        config.assistant.history_limit = 7;
        let behavior = config.to_behavior();
        assert_eq!(behavior.assistant_name, "Jeeves");
        assert_eq!(behavior.history_limit, 7);
    }
}
