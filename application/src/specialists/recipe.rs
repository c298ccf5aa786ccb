//! Recipe specialist
//!
//! Screens the request against hard dietary restrictions, then drafts a
//! recipe through the language gateway. The handback's data is the recipe
//! record itself; when the user also asks what they're missing, the
//! reconciled shopping list is embedded alongside it.

use std::sync::Arc;

use async_trait::async_trait;
use majordomo_domain::{
    Handback, Recipe, SessionState, ShoppingList, SpecialistId, SpecialistOutcome,
};
use serde_json::Value;

use crate::ports::language_gateway::{DraftOutcome, DraftRequest, LanguageGateway};
use crate::specialists::{restriction_conflict, Specialist, SpecialistError, SpecialistRequest};

pub struct RecipeSpecialist {
    gateway: Arc<dyn LanguageGateway>,
}

impl RecipeSpecialist {
    pub fn new(gateway: Arc<dyn LanguageGateway>) -> Self {
        Self { gateway }
    }

    /// Embed the reconciled shortfall into the handback data. Data that
    /// does not parse as a recipe is left untouched; validation downstream
    /// decides what becomes of it.
    fn embed_shopping_list(
        &self,
        handback: &mut Handback,
        state: &SessionState,
    ) -> Result<(), SpecialistError> {
        let Ok(recipe) = Recipe::from_value(handback.data.clone()) else {
            return Ok(());
        };
        let profile = state.profile()?;
        let list = ShoppingList::for_recipe(&recipe, &profile.inventory);
        if let Some(record) = handback.data.as_object_mut() {
            record.insert("shopping_list".to_string(), list.to_value()?);
        }
        Ok(())
    }
}

/// Whether the request also asks which ingredients are missing
fn wants_shopping_list(query: &str) -> bool {
    let query = query.to_lowercase();
    ["shopping list", "what do i need", "need to buy", "missing"]
        .iter()
        .any(|phrase| query.contains(phrase))
}

#[async_trait]
impl Specialist for RecipeSpecialist {
    fn id(&self) -> SpecialistId {
        SpecialistId::Recipe
    }

    async fn handle(
        &self,
        request: SpecialistRequest<'_>,
    ) -> Result<SpecialistOutcome, SpecialistError> {
        let profile = request.state.profile()?;

        if let Some(conflict) = restriction_conflict(request.query, &profile.dietary_restrictions())
        {
            return Ok(SpecialistOutcome::Clarification(format!(
                "I see your profile mentions you prefer {} dishes, but you're asking for \
                 a {} recipe. Would you like me to proceed with the {} recipe, or would \
                 you prefer a {} alternative?",
                conflict.restriction, conflict.trigger, conflict.trigger, conflict.restriction
            )));
        }

        let draft = self
            .gateway
            .draft(DraftRequest {
                specialist: SpecialistId::Recipe,
                query: request.query,
                profile: Some(&profile),
                context: None,
            })
            .await?;

        Ok(match draft {
            DraftOutcome::Clarification(question) => SpecialistOutcome::Clarification(question),
            // Free text carries no verifiable record; handback validation
            // downstream turns it into the apology.
            DraftOutcome::Text(text) => {
                SpecialistOutcome::Handback(Handback::new(text, Value::Null))
            }
            DraftOutcome::Handback(mut handback) => {
                if handback.is_well_formed() && wants_shopping_list(request.query) {
                    self.embed_shopping_list(&mut handback, request.state)?;
                }
                SpecialistOutcome::Handback(handback)
            }
        })
    }
}
