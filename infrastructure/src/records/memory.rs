//! In-memory record store.
//!
//! Collections are plain maps from assigned id to record. Good enough for
//! a single process; a real deployment would put a database behind the
//! same port.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use majordomo_application::ports::record_store::{RecordStore, RecordStoreError};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

/// Record store backed by nested `HashMap`s.
///
/// Assigned ids are random UUIDs; callers treat them as opaque strings.
/// Only JSON objects are accepted, matching what the durable backends
/// this stands in for can index.
pub struct InMemoryRecordStore {
    collections: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Number of records in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        match self.collections.read() {
            Ok(collections) => collections.get(collection).map_or(0, HashMap::len),
            Err(_) => 0,
        }
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn store_record(
        &self,
        collection: &str,
        record: Value,
    ) -> Result<String, RecordStoreError> {
        if !record.is_object() {
            return Err(RecordStoreError::InvalidRecord(
                "record must be a JSON object".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        let mut collections = self
            .collections
            .write()
            .map_err(|_| RecordStoreError::Backend("record map poisoned".to_string()))?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), record);
        debug!(collection, id = %id, "Stored record");
        Ok(id)
    }

    async fn find_record(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Value>, RecordStoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| RecordStoreError::Backend("record map poisoned".to_string()))?;
        Ok(collections
            .get(collection)
            .and_then(|records| records.get(id))
            .cloned())
    }
}
