//! Canned language gateway.
//!
//! A deterministic stand-in for a model behind the language port: a small
//! recipe book matched by trigger words, template dietary advice, and a
//! template persona summary. Lets the whole assistant run end to end
//! without network access or credentials.

use async_trait::async_trait;
use majordomo_application::ports::language_gateway::{
    DraftOutcome, DraftRequest, GatewayError, LanguageGateway,
};
use majordomo_domain::{format_quantity, Handback, Ingredient, Recipe, SpecialistId};
use serde_json::Value;
use tracing::debug;

/// Gateway serving canned drafts.
///
/// Recipe queries are matched against trigger words in order; the first
/// hit wins. Queries with no hit come back as a clarifying question, the
/// same way a model would ask for the missing detail.
pub struct CannedLanguageGateway {
    book: Vec<(&'static [&'static str], Recipe)>,
}

impl CannedLanguageGateway {
    pub fn new() -> Self {
        Self {
            book: vec![
                (
                    &["stir-fry", "stir fry", "chicken"],
                    chicken_stir_fry(),
                ),
                (
                    &["pasta", "spaghetti", "aglio"],
                    spaghetti_aglio_e_olio(),
                ),
                (&["omelette", "omelet", "egg"], vegetable_omelette()),
            ],
        }
    }

    fn draft_recipe(&self, query: &str) -> Result<DraftOutcome, GatewayError> {
        let lowered = query.to_lowercase();
        let hit = self
            .book
            .iter()
            .find(|(triggers, _)| triggers.iter().any(|t| lowered.contains(t)));

        match hit {
            Some((_, recipe)) => {
                debug!(recipe = %recipe.name, "Serving canned recipe");
                let data = recipe
                    .to_value()
                    .map_err(|e| GatewayError::Other(e.to_string()))?;
                Ok(DraftOutcome::Handback(Handback::new(present(recipe), data)))
            }
            None => Ok(DraftOutcome::Clarification(
                "I'd love to! Any main ingredients in mind, or a cuisine you're leaning \
                 toward?"
                    .to_string(),
            )),
        }
    }
}

impl Default for CannedLanguageGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageGateway for CannedLanguageGateway {
    async fn draft(&self, request: DraftRequest<'_>) -> Result<DraftOutcome, GatewayError> {
        match request.specialist {
            SpecialistId::Recipe => self.draft_recipe(request.query),
            SpecialistId::Dietary => Ok(DraftOutcome::Text(dietary_advice(request.context))),
            SpecialistId::Persona => Ok(DraftOutcome::Text(persona_summary(&request))),
            SpecialistId::Pantry | SpecialistId::Tasks => Ok(DraftOutcome::Text(
                "I can help with that. What exactly would you like me to do?".to_string(),
            )),
        }
    }
}

/// Announcement text carrying the full recipe formatted for display.
fn present(recipe: &Recipe) -> String {
    let mut text = format!(
        "I've whipped up a recipe for '{}' for you! Here are the details:\nRecipe: {}\nIngredients:",
        recipe.name, recipe.name
    );
    for ingredient in &recipe.ingredients {
        text.push_str(&format!(
            "\n- {}: {} {}",
            ingredient.name,
            format_quantity(ingredient.quantity),
            ingredient.unit
        ));
    }
    text.push_str("\nInstructions:");
    for (index, step) in recipe.instructions.iter().enumerate() {
        text.push_str(&format!("\n{}. {}", index + 1, step));
    }
    if let Some(prep) = &recipe.prep_time {
        text.push_str(&format!("\nPrep time: {prep}"));
    }
    if let Some(cook) = &recipe.cook_time {
        text.push_str(&format!("\nCook time: {cook}"));
    }
    if let Some(servings) = &recipe.servings {
        text.push_str(&format!("\nServings: {servings}"));
    }
    text
}

fn dietary_advice(context: Option<&Value>) -> String {
    let restrictions: Vec<String> = context
        .and_then(|value| value.get("dietary_restrictions"))
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let base = "Happy to help! As general guidance: build meals around vegetables, \
                legumes, and whole grains, and check labels for hidden animal products.";
    if restrictions.is_empty() {
        format!("{base} Your profile lists no restrictions, so the field is wide open.")
    } else {
        format!(
            "{base} Since your profile lists {}, I've kept that in mind.",
            restrictions.join(", ")
        )
    }
}

fn persona_summary(request: &DraftRequest<'_>) -> String {
    let Some(profile) = request.profile else {
        return "I don't know much about this household yet, but I'm learning with every \
                request."
            .to_string();
    };

    let saved = request
        .context
        .and_then(|value| value.get("saved_recipes"))
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    let cuisine = profile
        .preferences
        .get("favorite_cuisine")
        .and_then(Value::as_str)
        .unwrap_or("home");

    format!(
        "A snapshot of your household: user {}, {} pantry staples on hand, {} saved \
         recipes, and a soft spot for {} cooking.",
        profile.user_id,
        profile.inventory.len(),
        saved,
        cuisine
    )
}

fn chicken_stir_fry() -> Recipe {
    Recipe::new("Chicken Stir-Fry")
        .with_ingredient(Ingredient::new("chicken", 2.0, "pieces"))
        .with_ingredient(Ingredient::new("broccoli", 1.0, "head"))
        .with_ingredient(Ingredient::new("soy sauce", 3.0, "tbsp"))
        .with_ingredient(Ingredient::new("garlic", 2.0, "cloves"))
        .with_ingredient(Ingredient::new("olive oil", 1.0, "tbsp"))
        .with_instruction("Slice the chicken into thin strips.")
        .with_instruction("Stir-fry the chicken in olive oil over high heat.")
        .with_instruction("Add the broccoli, garlic, and soy sauce and toss for three minutes.")
        .with_instruction("Serve hot over rice.")
        .with_times("10 minutes", "15 minutes")
        .with_servings("2 servings")
}

fn spaghetti_aglio_e_olio() -> Recipe {
    Recipe::new("Spaghetti Aglio e Olio")
        .with_ingredient(Ingredient::new("Pasta", 200.0, "grams"))
        .with_ingredient(Ingredient::new("Garlic", 4.0, "cloves"))
        .with_ingredient(Ingredient::new("Olive Oil", 60.0, "ml"))
        .with_ingredient(Ingredient::new("Chili Flakes", 1.0, "tsp"))
        .with_instruction("Cook the spaghetti until al dente.")
        .with_instruction("Gently fry sliced garlic in the olive oil.")
        .with_instruction("Toss the pasta with the garlic oil and chili flakes.")
        .with_times("5 minutes", "15 minutes")
        .with_servings("2 servings")
}

fn vegetable_omelette() -> Recipe {
    Recipe::new("Vegetable Omelette")
        .with_ingredient(Ingredient::new("Eggs", 3.0, "pieces"))
        .with_ingredient(Ingredient::new("Butter", 20.0, "grams"))
        .with_ingredient(Ingredient::new("Tomato", 1.0, "pieces"))
        .with_ingredient(Ingredient::new("Onion", 1.0, "pieces"))
        .with_instruction("Whisk the eggs with a pinch of salt.")
        .with_instruction("Soften the onion and tomato in butter.")
        .with_instruction("Pour in the eggs and fold once set.")
        .with_times("5 minutes", "10 minutes")
        .with_servings("1 serving")
}

#[cfg(test)]
mod tests {
    use super::*;
    use majordomo_domain::UserProfile;
    use serde_json::json;

    fn request<'a>(specialist: SpecialistId, query: &'a str) -> DraftRequest<'a> {
        DraftRequest {
            specialist,
            query,
            profile: None,
            context: None,
        }
    }

    #[tokio::test]
    async fn test_known_dish_comes_back_as_handback() {
        let gateway = CannedLanguageGateway::new();
        let outcome = gateway
            .draft(request(SpecialistId::Recipe, "find me a stir-fry recipe"))
            .await
            .unwrap();

        let DraftOutcome::Handback(handback) = outcome else {
            panic!("expected a handback");
        };
        assert!(handback
            .announcement
            .starts_with("I've whipped up a recipe for 'Chicken Stir-Fry'"));
        assert!(handback.announcement.contains("- soy sauce: 3 tbsp"));
        assert!(handback.announcement.contains("Servings: 2 servings"));

        let recipe = Recipe::from_value(handback.data).unwrap();
        assert_eq!(recipe.name, "Chicken Stir-Fry");
        assert_eq!(recipe.ingredients.len(), 5);
    }

    #[tokio::test]
    async fn test_vague_request_asks_for_details() {
        let gateway = CannedLanguageGateway::new();
        let outcome = gateway
            .draft(request(SpecialistId::Recipe, "something delicious please"))
            .await
            .unwrap();
        assert!(matches!(outcome, DraftOutcome::Clarification(_)));
    }

    #[tokio::test]
    async fn test_dietary_advice_mentions_restrictions() {
        let gateway = CannedLanguageGateway::new();
        let context = json!({ "dietary_restrictions": ["vegan"] });
        let outcome = gateway
            .draft(DraftRequest {
                specialist: SpecialistId::Dietary,
                query: "is honey ok?",
                profile: None,
                context: Some(&context),
            })
            .await
            .unwrap();

        let DraftOutcome::Text(advice) = outcome else {
            panic!("expected free text");
        };
        assert!(advice.contains("vegan"));
    }

    #[tokio::test]
    async fn test_persona_summary_reads_profile() {
        let gateway = CannedLanguageGateway::new();
        let profile = UserProfile::starter();
        let context = json!({ "saved_recipes": [{"id": "r-1", "name": "Toast"}] });
        let outcome = gateway
            .draft(DraftRequest {
                specialist: SpecialistId::Persona,
                query: "what do you know about me?",
                profile: Some(&profile),
                context: Some(&context),
            })
            .await
            .unwrap();

        let DraftOutcome::Text(summary) = outcome else {
            panic!("expected free text");
        };
        assert!(summary.contains("default_user_001"));
        assert!(summary.contains("9 pantry staples"));
        assert!(summary.contains("1 saved"));
        assert!(summary.contains("Italian"));
    }
}
