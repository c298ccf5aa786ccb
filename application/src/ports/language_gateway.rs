//! Language gateway port
//!
//! Defines the interface to the language capability. The gateway is a
//! black box: handed a specialist's drafting request, it returns free
//! text, a clarifying question, or a finished handback. Nothing in the
//! core generates or interprets natural language itself.

use async_trait::async_trait;
use majordomo_domain::{Handback, SpecialistId, UserProfile};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during language gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// A specialist's drafting request
#[derive(Debug)]
pub struct DraftRequest<'a> {
    /// Which specialist is asking; implementations pick their register
    /// and output shape from this.
    pub specialist: SpecialistId,
    /// The user's words, untouched.
    pub query: &'a str,
    /// The profile, when one exists, for preference-aware drafting.
    pub profile: Option<&'a UserProfile>,
    /// Extra structured context the specialist wants considered.
    pub context: Option<&'a Value>,
}

/// What the language capability produced
#[derive(Debug, Clone, PartialEq)]
pub enum DraftOutcome {
    /// Plain prose with no structured payload
    Text(String),
    /// The capability needs the user to narrow the request
    Clarification(String),
    /// A finished announcement plus structured data
    Handback(Handback),
}

/// Gateway to the language capability
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LanguageGateway: Send + Sync {
    async fn draft(&self, request: DraftRequest<'_>) -> Result<DraftOutcome, GatewayError>;
}
