//! Specialists: the staff the coordinator delegates to.
//!
//! Each specialist consumes the user's query plus mutable session state
//! and finishes with exactly one [`SpecialistOutcome`]: a handback or a
//! clarifying question. Specialists never talk to the user directly and
//! never call the coordinator; control returns by function return.

pub mod dietary;
pub mod pantry;
pub mod persona;
pub mod recipe;
pub mod tasks;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use majordomo_domain::{DomainError, SessionState, SpecialistId, SpecialistOutcome};
use thiserror::Error;

use crate::ports::language_gateway::GatewayError;

pub use dietary::DietarySpecialist;
pub use pantry::PantrySpecialist;
pub use persona::PersonaSpecialist;
pub use recipe::RecipeSpecialist;
pub use tasks::TasksSpecialist;

/// Errors a specialist can fail with.
///
/// These never reach the user as errors; the coordinator turns any of
/// them into a generic failure reply and ends the turn.
#[derive(Error, Debug)]
pub enum SpecialistError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Specialist failure: {0}")]
    Internal(String),
}

/// One delegation's input
pub struct SpecialistRequest<'a> {
    /// The user's words, untouched.
    pub query: &'a str,
    /// Session identity, for anything the specialist records.
    pub session_id: &'a str,
    /// The conversation's state, held exclusively for this turn.
    pub state: &'a mut SessionState,
}

/// A delegatable specialist
#[async_trait]
pub trait Specialist: Send + Sync {
    fn id(&self) -> SpecialistId;

    async fn handle(
        &self,
        request: SpecialistRequest<'_>,
    ) -> Result<SpecialistOutcome, SpecialistError>;
}

/// Maps specialist ids to implementations
pub struct SpecialistRegistry {
    specialists: HashMap<SpecialistId, Arc<dyn Specialist>>,
}

impl SpecialistRegistry {
    pub fn new() -> Self {
        Self {
            specialists: HashMap::new(),
        }
    }

    pub fn register(mut self, specialist: Arc<dyn Specialist>) -> Self {
        self.specialists.insert(specialist.id(), specialist);
        self
    }

    pub fn get(&self, id: SpecialistId) -> Option<Arc<dyn Specialist>> {
        self.specialists.get(&id).cloned()
    }

    pub fn ids(&self) -> Vec<SpecialistId> {
        self.specialists.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.specialists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specialists.is_empty()
    }
}

impl Default for SpecialistRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A dietary restriction the query runs against
#[derive(Debug, Clone, PartialEq)]
pub struct RestrictionConflict {
    pub restriction: String,
    pub trigger: String,
}

const MEAT_WORDS: &[&str] = &[
    "chicken", "beef", "pork", "bacon", "ham", "lamb", "turkey", "duck", "sausage", "steak",
    "meat", "fish", "salmon", "tuna", "shrimp", "prawn", "anchovy",
];

const ANIMAL_PRODUCT_WORDS: &[&str] = &[
    "milk", "cheese", "butter", "yogurt", "cream", "egg", "eggs", "honey",
];

/// Check a query against hard profile restrictions.
///
/// Only exact restrictions count: `vegetarian` and `vegan` trigger,
/// soft preferences like `vegetarian_friendly` never do.
pub fn restriction_conflict(query: &str, restrictions: &[String]) -> Option<RestrictionConflict> {
    let tokens: Vec<String> = query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();

    for restriction in restrictions {
        let normalized = restriction.trim().to_lowercase();
        let banned: Vec<&str> = match normalized.as_str() {
            "vegetarian" => MEAT_WORDS.to_vec(),
            "vegan" => [MEAT_WORDS, ANIMAL_PRODUCT_WORDS].concat(),
            _ => continue,
        };
        if let Some(trigger) = tokens.iter().find(|token| banned.contains(&token.as_str())) {
            return Some(RestrictionConflict {
                restriction: normalized,
                trigger: trigger.clone(),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use majordomo_domain::Handback;

    struct EchoSpecialist(SpecialistId);

    #[async_trait]
    impl Specialist for EchoSpecialist {
        fn id(&self) -> SpecialistId {
            self.0
        }

        async fn handle(
            &self,
            request: SpecialistRequest<'_>,
        ) -> Result<SpecialistOutcome, SpecialistError> {
            Ok(SpecialistOutcome::Handback(Handback::new(
                request.query,
                serde_json::json!({}),
            )))
        }
    }

    #[test]
    fn test_registry_lookup() {
        let registry = SpecialistRegistry::new()
            .register(Arc::new(EchoSpecialist(SpecialistId::Recipe)))
            .register(Arc::new(EchoSpecialist(SpecialistId::Pantry)));

        assert_eq!(registry.len(), 2);
        assert!(registry.get(SpecialistId::Recipe).is_some());
        assert!(registry.get(SpecialistId::Dietary).is_none());
    }

    #[test]
    fn test_registering_same_id_replaces() {
        let registry = SpecialistRegistry::new()
            .register(Arc::new(EchoSpecialist(SpecialistId::Tasks)))
            .register(Arc::new(EchoSpecialist(SpecialistId::Tasks)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_vegetarian_conflict() {
        let restrictions = vec!["vegetarian".to_string()];
        let conflict = restriction_conflict("a chicken stir-fry please", &restrictions).unwrap();
        assert_eq!(conflict.trigger, "chicken");

        assert!(restriction_conflict("a mushroom risotto", &restrictions).is_none());
    }

    #[test]
    fn test_soft_preferences_never_conflict() {
        let restrictions = vec!["vegetarian_friendly".to_string()];
        assert!(restriction_conflict("a chicken stir-fry please", &restrictions).is_none());
    }

    #[test]
    fn test_vegan_also_flags_dairy() {
        let restrictions = vec!["vegan".to_string()];
        let conflict = restriction_conflict("mac and cheese tonight?", &restrictions).unwrap();
        assert_eq!(conflict.trigger, "cheese");
    }

    #[test]
    fn test_conflict_matches_whole_tokens_only() {
        let restrictions = vec!["vegetarian".to_string()];
        // "meatless" must not trigger on "meat"
        assert!(restriction_conflict("something meatless", &restrictions).is_none());
    }
}
