//! Dietary advice specialist
//!
//! Drafts nutrition and substitution advice through the language gateway,
//! flagging queries that collide with the profile's hard restrictions
//! before any drafting happens. Advice always hands back with the
//! restrictions that were considered, so the caller can show its work.

use std::sync::Arc;

use async_trait::async_trait;
use majordomo_domain::{Handback, SpecialistId, SpecialistOutcome};
use serde_json::json;

use crate::ports::language_gateway::{DraftOutcome, DraftRequest, LanguageGateway};
use crate::specialists::{restriction_conflict, Specialist, SpecialistError, SpecialistRequest};

pub struct DietarySpecialist {
    gateway: Arc<dyn LanguageGateway>,
}

impl DietarySpecialist {
    pub fn new(gateway: Arc<dyn LanguageGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Specialist for DietarySpecialist {
    fn id(&self) -> SpecialistId {
        SpecialistId::Dietary
    }

    async fn handle(
        &self,
        request: SpecialistRequest<'_>,
    ) -> Result<SpecialistOutcome, SpecialistError> {
        let profile = request.state.profile()?;
        let restrictions = profile.dietary_restrictions();

        if let Some(conflict) = restriction_conflict(request.query, &restrictions) {
            return Ok(SpecialistOutcome::Clarification(format!(
                "I see your profile mentions you keep {}, but you're asking about {}. \
                 Should I tailor the advice to your {} preference, or answer exactly as \
                 asked?",
                conflict.restriction, conflict.trigger, conflict.restriction
            )));
        }

        let context = json!({ "dietary_restrictions": restrictions });
        let draft = self
            .gateway
            .draft(DraftRequest {
                specialist: SpecialistId::Dietary,
                query: request.query,
                profile: Some(&profile),
                context: Some(&context),
            })
            .await?;

        Ok(match draft {
            DraftOutcome::Clarification(question) => SpecialistOutcome::Clarification(question),
            DraftOutcome::Text(advice) => SpecialistOutcome::Handback(Handback::new(
                advice,
                json!({ "restrictions_considered": restrictions }),
            )),
            DraftOutcome::Handback(handback) => SpecialistOutcome::Handback(handback),
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
        calls: Mutex<usize>,
    }

    impl QueuedGateway {
        fn new(responses: Vec<DraftOutcome>) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from(responses)),
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl LanguageGateway for QueuedGateway {
        async fn draft(&self, _request: DraftRequest<'_>) -> Result<DraftOutcome, GatewayError> {
            *self.calls.lock().unwrap() += 1;
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| GatewayError::Other("No more responses".to_string()))
        }
    }

    fn vegan_state() -> SessionState {
        let mut profile = UserProfile::starter();
        profile
            .preferences
            .insert("dietary_restrictions".to_string(), json!(["vegan"]));
        let mut state = SessionState::new();
        state.initialize(&profile).unwrap();
        state
    }

    #[tokio::test]
    async fn test_advice_hands_back_with_restrictions() {
        let gateway = Arc::new(QueuedGateway::new(vec![DraftOutcome::Text(
            "Lentils and chickpeas are excellent protein sources.".to_string(),
        )]));
        let specialist = DietarySpecialist::new(gateway);
        let mut state = vegan_state();

        let outcome = specialist
            .handle(SpecialistRequest {
                query: "good protein sources?",
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
            handback.data["restrictions_considered"],
            json!(["vegan"])
        );
    }

    #[tokio::test]
    async fn test_conflict_asks_before_drafting() {
        let gateway = Arc::new(QueuedGateway::new(vec![]));
        let specialist = DietarySpecialist::new(gateway.clone());
        let mut state = vegan_state();

        let outcome = specialist
            .handle(SpecialistRequest {
                query: "how much cheese per day is healthy?",
                session_id: "s1",
                state: &mut state,
            })
            .await
            .unwrap();

        let SpecialistOutcome::Clarification(question) = outcome else {
            panic!("expected a clarifying question");
        };
        assert!(question.contains("vegan"));
        assert!(question.contains("cheese"));
        assert_eq!(*gateway.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_gateway_clarification_passes_through() {
        let gateway = Arc::new(QueuedGateway::new(vec![DraftOutcome::Clarification(
            "Advice for which meal of the day?".to_string(),
        )]));
        let specialist = DietarySpecialist::new(gateway);
        let mut state = vegan_state();

        let outcome = specialist
            .handle(SpecialistRequest {
                query: "what should I eat?",
                session_id: "s1",
                state: &mut state,
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SpecialistOutcome::Clarification("Advice for which meal of the day?".to_string())
        );
    }
}
