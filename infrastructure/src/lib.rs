//! Infrastructure layer for majordomo
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod classifier;
pub mod config;
pub mod language;
pub mod logging;
pub mod records;
pub mod session;

// Re-export commonly used types
pub use classifier::KeywordIntentClassifier;
pub use config::{
    ConfigLoader, FileAssistantConfig, FileConfig, FileLoggingConfig, FileOutputConfig,
    FileReplConfig,
};
pub use language::CannedLanguageGateway;
pub use logging::JsonlConversationLogger;
pub use records::InMemoryRecordStore;
pub use session::InMemorySessionStore;
