//! Application-level configuration.
//!
//! This module provides configuration types that control how the turn
//! use case behaves, such as the assistant's presented name and how much
//! chat history a session retains.

/// Application behavior configuration.
///
/// Controls runtime behavior of the turn loop; none of this is domain
/// policy.
#[derive(Debug, Clone)]
pub struct BehaviorConfig {
    /// Name the coordinator introduces itself with in greetings.
    pub assistant_name: String,
    /// Chat history entries retained per session; 0 disables the cap.
    pub history_limit: usize,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            assistant_name: "Majordomo".to_string(),
            history_limit: 50,
        }
    }
}

impl BehaviorConfig {
    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}
