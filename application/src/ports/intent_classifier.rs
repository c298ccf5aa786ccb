//! Intent classifier port
//!
//! Turns one user message into a [`Route`]: answer directly, ask one
//! clarifying question, delegate to a specialist, or run a coordinator
//! command. Classification is a pure decision that must not touch
//! session state, so implementations range from keyword tables to
//! model-backed routers without the coordinator caring.

use async_trait::async_trait;
use majordomo_domain::{Route, UserProfile};
use thiserror::Error;

/// Errors that can occur during classification
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),
}

/// Classifies a user turn into a route
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(
        &self,
        query: &str,
        profile: Option<&UserProfile>,
    ) -> Result<Route, ClassifierError>;
}
