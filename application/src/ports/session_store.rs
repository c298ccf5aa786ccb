//! Session store port
//!
//! Defines how the application layer obtains per-conversation state.
//! Whoever opens a session receives it behind its own mutex; holding the
//! lock for a whole turn is what serializes concurrent turns on the same
//! session instead of letting them interleave writes.

use std::sync::Arc;

use async_trait::async_trait;
use majordomo_domain::SessionState;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur while opening sessions
#[derive(Error, Debug)]
pub enum SessionStoreError {
    #[error("Backend error: {0}")]
    Backend(String),
}

/// An opened session: its id and the shared, lockable state.
///
/// `created` is true when this call brought the session into existence
/// (and seeded it), false when it already existed.
pub struct SessionLease {
    pub session_id: String,
    pub state: Arc<Mutex<SessionState>>,
    pub created: bool,
}

/// Store of per-conversation state
///
/// Implementations (adapters) live in the infrastructure layer. Opening
/// with `None` creates a fresh session under a generated id; opening with
/// an unknown id creates the session under that id. New sessions come
/// back already seeded.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn open(&self, requested: Option<&str>) -> Result<SessionLease, SessionStoreError>;
}
