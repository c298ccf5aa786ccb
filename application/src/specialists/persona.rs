//! Persona specialist
//!
//! Synthesizes a butler-persona summary (how the household likes to be
//! served) from what the session already knows: profile preferences,
//! pantry, saved recipes, and recent conversation. The summary is drafted
//! by the language gateway and kept under its own session key so later
//! turns can build on it.

use std::sync::Arc;

use async_trait::async_trait;
use majordomo_domain::{keys, Handback, SpecialistId, SpecialistOutcome};
use serde_json::{json, Value};

use crate::ports::language_gateway::{DraftOutcome, DraftRequest, LanguageGateway};
use crate::specialists::{Specialist, SpecialistError, SpecialistRequest};

pub struct PersonaSpecialist {
    gateway: Arc<dyn LanguageGateway>,
}

impl PersonaSpecialist {
    pub fn new(gateway: Arc<dyn LanguageGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Specialist for PersonaSpecialist {
    fn id(&self) -> SpecialistId {
        SpecialistId::Persona
    }

    async fn handle(
        &self,
        request: SpecialistRequest<'_>,
    ) -> Result<SpecialistOutcome, SpecialistError> {
        let profile = request.state.profile()?;

        let saved_recipes = request
            .state
            .get(keys::SAVED_RECIPES_LIST)
            .cloned()
            .unwrap_or(Value::Array(Vec::new()));
        let recent_history = match request.state.get(keys::CHAT_HISTORY) {
            Some(Value::Array(history)) => {
                let tail = history.len().saturating_sub(10);
                Value::Array(history[tail..].to_vec())
            }
            _ => Value::Array(Vec::new()),
        };
        let context = json!({
            "saved_recipes": saved_recipes,
            "recent_history": recent_history,
        });

        let draft = self
            .gateway
            .draft(DraftRequest {
                specialist: SpecialistId::Persona,
                query: request.query,
                profile: Some(&profile),
                context: Some(&context),
            })
            .await?;

        Ok(match draft {
            DraftOutcome::Clarification(question) => SpecialistOutcome::Clarification(question),
            DraftOutcome::Text(summary) => {
                request
                    .state
                    .set(keys::PERSONA_SUMMARY, Value::String(summary.clone()));
                SpecialistOutcome::Handback(Handback::new(
                    summary.clone(),
                    json!({ "persona_summary": summary }),
                ))
            }
            DraftOutcome::Handback(handback) => {
                if let Some(summary) = handback
                    .record()
                    .and_then(|record| record.get("persona_summary"))
                    .cloned()
                {
                    request.state.set(keys::PERSONA_SUMMARY, summary);
                }
                SpecialistOutcome::Handback(handback)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use majordomo_domain::{SessionState, UserProfile};

    use crate::ports::language_gateway::GatewayError;

    struct QueuedGateway {
        responses: Mutex<VecDeque<DraftOutcome>>,
    }

    impl QueuedGateway {
        fn new(responses: Vec<DraftOutcome>) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from(responses)),
            }
        }
    }

    #[async_trait]
    impl LanguageGateway for QueuedGateway {
        async fn draft(&self, _request: DraftRequest<'_>) -> Result<DraftOutcome, GatewayError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| GatewayError::Other("No more responses".to_string()))
        }
    }

    #[tokio::test]
    async fn test_summary_is_stored_and_handed_back() {
        let gateway = Arc::new(QueuedGateway::new(vec![DraftOutcome::Text(
            "A household that favors simple Italian vegetarian cooking.".to_string(),
        )]));
        let specialist = PersonaSpecialist::new(gateway);

        let mut state = SessionState::new();
        state.initialize(&UserProfile::starter()).unwrap();

        let outcome = specialist
            .handle(SpecialistRequest {
                query: "what have you learned about us?",
                session_id: "s1",
                state: &mut state,
            })
            .await
            .unwrap();

        let SpecialistOutcome::Handback(handback) = outcome else {
            panic!("expected a handback");
        };
        assert!(handback.is_well_formed());
        assert_eq!(
            state.get(keys::PERSONA_SUMMARY),
            Some(&json!(
                "A household that favors simple Italian vegetarian cooking."
            ))
        );
    }

    #[tokio::test]
    async fn test_structured_summary_is_stored() {
        let gateway = Arc::new(QueuedGateway::new(vec![DraftOutcome::Handback(
            Handback::new(
                "Here's how I'd describe this household.",
                json!({"persona_summary": "Busy weeknight cooks."}),
            ),
        )]));
        let specialist = PersonaSpecialist::new(gateway);

        let mut state = SessionState::new();
        state.initialize(&UserProfile::starter()).unwrap();

        specialist
            .handle(SpecialistRequest {
                query: "describe us",
                session_id: "s1",
                state: &mut state,
            })
            .await
            .unwrap();

        assert_eq!(
            state.get(keys::PERSONA_SUMMARY),
            Some(&json!("Busy weeknight cooks."))
        );
    }
}
