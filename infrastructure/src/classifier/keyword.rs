//! Deterministic keyword intent classifier.
//!
//! A routing table over lowercased phrases, specific rules first. It keeps
//! the whole system runnable and testable without a model behind the
//! classifier port; swapping in a model-backed router is a wiring change.

use async_trait::async_trait;
use majordomo_application::ports::intent_classifier::{ClassifierError, IntentClassifier};
use majordomo_domain::{DirectCommand, Route, SpecialistId, UserProfile};
use tracing::debug;

const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "hiya", "greetings", "howdy"];

/// Phrases that mark a request for a new recipe rather than bookkeeping
/// over saved ones.
const RECIPE_REQUEST_MARKERS: &[&str] = &[
    "recipe for",
    "a recipe",
    "find me",
    "suggest",
    "what can i make",
    "what can i cook",
    "how do i make",
    "how do i cook",
];

const PANTRY_MARKERS: &[&str] = &[
    "pantry",
    "inventory",
    "in stock",
    "do i have",
    "do we have",
    "have any",
    "kitchen",
    "fridge",
];

const DIETARY_MARKERS: &[&str] = &[
    "vegetarian",
    "vegan",
    "dietary",
    "diet",
    "nutrition",
    "allerg",
    "healthy",
];

const TASK_MARKERS: &[&str] = &["task", "remind", "chore", "to-do", "todo"];

const PERSONA_MARKERS: &[&str] = &["about me", "my profile", "persona", "who am i"];

/// Keyword-table classifier.
///
/// Rule order, most specific first: saved-recipe count, save, shopping
/// list, greeting, recipe, pantry, dietary, tasks, persona, then a
/// clarifying fallback.
pub struct KeywordIntentClassifier {
    assistant_name: String,
}

impl KeywordIntentClassifier {
    pub fn new() -> Self {
        Self {
            assistant_name: "Majordomo".to_string(),
        }
    }

    /// Use a different name in greeting replies.
    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    fn route(&self, query: &str) -> Route {
        let lowered = query.trim().to_lowercase();

        if lowered.contains("how many recipes")
            || (lowered.contains("count") && lowered.contains("recipe"))
        {
            return Route::Command(DirectCommand::CountSavedRecipes);
        }

        if lowered.contains("save") && (lowered.contains("recipe") || saves_presented(&lowered)) {
            return Route::Command(DirectCommand::SaveRecipe);
        }

        if lowered.contains("shopping list") {
            // "a recipe for X with a shopping list" is a fresh recipe
            // request; the list rides along in the handback instead.
            if contains_any(&lowered, RECIPE_REQUEST_MARKERS) {
                return Route::Delegate(SpecialistId::Recipe);
            }
            return Route::Command(DirectCommand::BuildShoppingList {
                recipe: recipe_reference(&lowered),
            });
        }

        if is_greeting(&lowered) {
            return Route::Answer(format!(
                "Hello! I'm {}, your friendly personal assistant. How can I help you today?",
                self.assistant_name
            ));
        }

        if lowered.contains("recipe")
            || lowered.contains("dish")
            || lowered.contains("meal")
            || contains_any(&lowered, RECIPE_REQUEST_MARKERS)
        {
            return Route::Delegate(SpecialistId::Recipe);
        }

        if contains_any(&lowered, PANTRY_MARKERS) {
            return Route::Delegate(SpecialistId::Pantry);
        }

        if contains_any(&lowered, DIETARY_MARKERS) {
            return Route::Delegate(SpecialistId::Dietary);
        }

        if contains_any(&lowered, TASK_MARKERS) {
            return Route::Delegate(SpecialistId::Tasks);
        }

        if contains_any(&lowered, PERSONA_MARKERS) {
            return Route::Delegate(SpecialistId::Persona);
        }

        Route::Clarify(
            "I'm not quite sure what you'd like me to do. I can find recipes, manage your \
             pantry, keep track of household tasks, or answer questions about your \
             preferences. What would you like?"
                .to_string(),
        )
    }
}

impl Default for KeywordIntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentClassifier for KeywordIntentClassifier {
    async fn classify(
        &self,
        query: &str,
        _profile: Option<&UserProfile>,
    ) -> Result<Route, ClassifierError> {
        let route = self.route(query);
        debug!(?route, "Classified query");
        Ok(route)
    }
}

fn contains_any(lowered: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| lowered.contains(marker))
}

/// "save it", "save that", "save this" after a recipe was presented.
fn saves_presented(lowered: &str) -> bool {
    lowered.contains("save it") || lowered.contains("save that") || lowered.contains("save this")
}

fn is_greeting(lowered: &str) -> bool {
    if lowered.starts_with("good morning")
        || lowered.starts_with("good afternoon")
        || lowered.starts_with("good evening")
    {
        return true;
    }
    match lowered.split_whitespace().next() {
        Some(first) => GREETING_WORDS.contains(&first.trim_matches(|c: char| !c.is_alphanumeric())),
        None => false,
    }
}

/// Pull the recipe reference out of "shopping list for <name>", if any.
fn recipe_reference(lowered: &str) -> Option<String> {
    let after = lowered.rsplit_once(" for ")?.1;
    let mut name = after.trim().trim_end_matches(['.', '!', '?']).trim();
    for prefix in ["the ", "my "] {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest;
        }
    }
    for suffix in [" i just saved", " i saved", " that i saved", " we saved"] {
        if let Some(rest) = name.strip_suffix(suffix) {
            name = rest;
        }
    }
    let name = name.trim();
    if name.is_empty() || matches!(name, "me" | "us" | "it" | "that" | "this") {
        return None;
    }
    Some(name.to_string())
}
