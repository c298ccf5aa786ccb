//! Durable record store port
//!
//! The narrow seam to whatever keeps records beyond the process: store a
//! record into a named collection and get back an opaque id, or look one
//! up by id. Append-mostly; a missing record is a normal `None`, not an
//! error.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during record store operations
#[derive(Error, Debug)]
pub enum RecordStoreError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Durable persistence for user records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist `record` into `collection`, returning the assigned id.
    /// Ids are opaque to callers; nothing may be derived from them.
    async fn store_record(&self, collection: &str, record: Value)
        -> Result<String, RecordStoreError>;

    /// Look up a record by id. `Ok(None)` means it simply isn't there.
    async fn find_record(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Value>, RecordStoreError>;
}
