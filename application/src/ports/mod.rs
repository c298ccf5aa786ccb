//! Port definitions: interfaces the application layer expects its
//! collaborators to implement.

pub mod conversation_logger;
pub mod intent_classifier;
pub mod language_gateway;
pub mod record_store;
pub mod session_store;

pub use conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
pub use intent_classifier::{ClassifierError, IntentClassifier};
pub use language_gateway::{DraftOutcome, DraftRequest, GatewayError, LanguageGateway};
pub use record_store::{RecordStore, RecordStoreError};
pub use session_store::{SessionLease, SessionStore, SessionStoreError};
