//! Application layer for majordomo
//!
//! This crate contains use cases, specialist implementations, port
//! definitions, and application configuration. It depends only on the
//! domain layer.

pub mod config;
pub mod ports;
pub mod specialists;
pub mod use_cases;

// Re-export commonly used types
pub use config::BehaviorConfig;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    intent_classifier::{ClassifierError, IntentClassifier},
    language_gateway::{DraftOutcome, DraftRequest, GatewayError, LanguageGateway},
    record_store::{RecordStore, RecordStoreError},
    session_store::{SessionLease, SessionStore, SessionStoreError},
};
pub use specialists::{
    DietarySpecialist, PantrySpecialist, PersonaSpecialist, RecipeSpecialist, Specialist,
    SpecialistError, SpecialistRegistry, SpecialistRequest, TasksSpecialist,
};
pub use use_cases::handle_turn::{
    HandleTurnInput, HandleTurnUseCase, TurnError, TurnReply,
};
