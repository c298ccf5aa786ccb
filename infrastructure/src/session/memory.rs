//! In-memory session store.
//!
//! Holds every session behind a process-wide map. Each session's state
//! sits in its own `tokio::sync::Mutex` so the coordinator can hold one
//! session for a whole turn without blocking the others.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use majordomo_application::ports::session_store::{SessionLease, SessionStore, SessionStoreError};
use majordomo_domain::{SessionState, UserProfile};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Session store backed by a `HashMap`, for single-process use.
///
/// Every new session is seeded with the configured profile before it is
/// handed out. Unknown requested ids are honored: callers that bring
/// their own id get a fresh session under exactly that id.
pub struct InMemorySessionStore {
    /// `std::sync::RwLock`, not the tokio one: the guard is only held
    /// for map lookups and inserts, never across an await.
    sessions: RwLock<HashMap<String, Arc<Mutex<SessionState>>>>,
    profile: UserProfile,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_profile(UserProfile::starter())
    }

    /// Seed new sessions with a specific profile instead of the starter.
    pub fn with_profile(profile: UserProfile) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            profile,
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        match self.sessions.read() {
            Ok(sessions) => sessions.len(),
            Err(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn open(&self, requested: Option<&str>) -> Result<SessionLease, SessionStoreError> {
        let session_id = match requested {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };

        {
            let sessions = self
                .sessions
                .read()
                .map_err(|_| SessionStoreError::Backend("session map poisoned".to_string()))?;
            if let Some(state) = sessions.get(&session_id) {
                debug!(session_id = %session_id, "Reopened session");
                return Ok(SessionLease {
                    session_id,
                    state: state.clone(),
                    created: false,
                });
            }
        }

        let mut state = SessionState::new();
        state
            .initialize(&self.profile)
            .map_err(|e| SessionStoreError::Backend(e.to_string()))?;
        let state = Arc::new(Mutex::new(state));

        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| SessionStoreError::Backend("session map poisoned".to_string()))?;
        // A concurrent open may have created the session between the read
        // and the write lock; the first insert wins.
        let entry = sessions.entry(session_id.clone()).or_insert(state);
        let lease = SessionLease {
            session_id,
            state: entry.clone(),
            created: true,
        };
        info!(session_id = %lease.session_id, "Created session");
        Ok(lease)
    }
}
