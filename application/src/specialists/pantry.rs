//! Pantry specialist
//!
//! Deterministic stock keeping against the profile inventory: add,
//! remove, check, and list. No language capability involved; requests
//! are parsed from the query text, and anything unparseable comes back
//! as a clarifying question instead of a guess.

use async_trait::async_trait;
use majordomo_domain::{
    format_quantity, Handback, Ingredient, SpecialistId, SpecialistOutcome, StockChange,
    StockRemoval, UserProfile,
};
use serde_json::json;
use tracing::debug;

use crate::specialists::{Specialist, SpecialistError, SpecialistRequest};

/// What the user asked the pantry keeper to do
#[derive(Debug, Clone, PartialEq)]
enum PantryAction {
    Add { item: Ingredient },
    Remove { name: String, quantity: f64, unit: String },
    Check { name: String },
    List,
}

#[derive(Debug, Clone, PartialEq)]
enum ParsedRequest {
    Action(PantryAction),
    NeedsDetail(String),
}

const ADD_VERBS: &[&str] = &["add", "bought", "got", "put", "picked", "restocked"];
const REMOVE_VERBS: &[&str] = &["remove", "used", "take", "took", "finished", "ate", "drank"];
const CHECK_WORDS: &[&str] = &["check", "do", "have", "any", "there", "is", "left"];
const FILLER: &[&str] = &[
    "of", "the", "my", "some", "a", "an", "i", "we", "please", "to", "from", "in", "into", "up",
    "pantry", "inventory", "kitchen", "stock", "can", "you", "me", "just",
];

/// Units the parser recognizes; anything else after a quantity is part of
/// the item name and the quantity counts "pieces".
const KNOWN_UNITS: &[&str] = &[
    "kg", "g", "gram", "grams", "piece", "pieces", "liter", "liters", "litre", "litres", "ml",
    "tbsp", "tsp", "cup", "cups", "head", "heads", "loaf", "loaves", "clove", "cloves", "pinch",
    "slice", "slices",
];

fn parse_request(query: &str) -> ParsedRequest {
    let lowered = query.to_lowercase();
    let raw_tokens: Vec<&str> = query
        .split(|c: char| !(c.is_alphanumeric() || c == '.'))
        .map(|token| token.trim_matches('.'))
        .filter(|token| !token.is_empty())
        .collect();
    let tokens: Vec<String> = raw_tokens.iter().map(|t| t.to_lowercase()).collect();

    if tokens.iter().any(|t| t == "list" || t == "show" || t == "everything")
        || lowered.contains("what's in")
        || lowered.contains("whats in")
        || lowered.contains("what is in")
    {
        return ParsedRequest::Action(PantryAction::List);
    }

    let checking = lowered.contains("do i have")
        || lowered.contains("have any")
        || lowered.contains("is there")
        || tokens.iter().any(|t| t == "check");
    if checking {
        let name = item_name(&raw_tokens, &tokens, &[], None);
        return if name.is_empty() {
            ParsedRequest::NeedsDetail("Which item should I check your pantry for?".to_string())
        } else {
            ParsedRequest::Action(PantryAction::Check { name })
        };
    }

    let verb_index = tokens
        .iter()
        .position(|t| ADD_VERBS.contains(&t.as_str()) || REMOVE_VERBS.contains(&t.as_str()));
    let Some(verb_index) = verb_index else {
        return ParsedRequest::NeedsDetail(
            "I can add, remove, check, or list what's in your pantry. What would you like me \
             to do?"
                .to_string(),
        );
    };
    let adding = ADD_VERBS.contains(&tokens[verb_index].as_str());

    let quantity_index = tokens.iter().position(|t| t.parse::<f64>().is_ok());
    let Some(quantity_index) = quantity_index else {
        let question = if adding {
            "How much should I add? Please include a quantity and unit, like '2 kg of flour'."
        } else {
            "How much should I take out? Please include a quantity and unit, like '1 liter \
             of milk'."
        };
        return ParsedRequest::NeedsDetail(question.to_string());
    };
    // parse() succeeded just above
    let quantity: f64 = tokens[quantity_index].parse().unwrap_or(0.0);

    let unit_index = tokens
        .get(quantity_index + 1)
        .filter(|t| KNOWN_UNITS.contains(&t.as_str()))
        .map(|_| quantity_index + 1);
    let unit = unit_index
        .map(|i| tokens[i].clone())
        .unwrap_or_else(|| "pieces".to_string());

    let name = item_name(&raw_tokens, &tokens, &[verb_index, quantity_index], unit_index);
    if name.is_empty() {
        return ParsedRequest::NeedsDetail(
            "Which item do you mean? Name it with a quantity and unit, like '2 kg of flour'."
                .to_string(),
        );
    }

    ParsedRequest::Action(if adding {
        PantryAction::Add {
            item: Ingredient::new(name, quantity, unit),
        }
    } else {
        PantryAction::Remove {
            name,
            quantity,
            unit,
        }
    })
}

/// The item name in the user's own casing: every token that is not a
/// verb, quantity, unit, filler, or question word.
fn item_name(
    raw_tokens: &[&str],
    tokens: &[String],
    skip_indices: &[usize],
    unit_index: Option<usize>,
) -> String {
    let mut parts = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        if skip_indices.contains(&index) || unit_index == Some(index) {
            continue;
        }
        let t = token.as_str();
        if FILLER.contains(&t)
            || CHECK_WORDS.contains(&t)
            || ADD_VERBS.contains(&t)
            || REMOVE_VERBS.contains(&t)
            || t.parse::<f64>().is_ok()
        {
            continue;
        }
        parts.push(raw_tokens[index]);
    }
    parts.join(" ")
}

/// Keeps the profile inventory
pub struct PantrySpecialist;

impl PantrySpecialist {
    pub fn new() -> Self {
        Self
    }

    fn apply(&self, action: PantryAction, profile: &mut UserProfile) -> (Handback, bool) {
        match action {
            PantryAction::Add { item } => {
                let handback = match profile.add_stock(item.clone()) {
                    StockChange::Topped { total } => Handback::new(
                        format!(
                            "{} quantity updated to {} {}.",
                            item.name,
                            format_quantity(total),
                            item.unit
                        ),
                        json!({"action": "add", "item": item, "merged": true}),
                    ),
                    StockChange::Added => Handback::new(
                        format!(
                            "{} {} of {} added to your pantry.",
                            format_quantity(item.quantity),
                            item.unit,
                            item.name
                        ),
                        json!({"action": "add", "item": item, "merged": false}),
                    ),
                };
                (handback, true)
            }
            PantryAction::Remove {
                name,
                quantity,
                unit,
            } => {
                let removal = profile.take_stock(&name, quantity, &unit);
                let changed = matches!(
                    removal,
                    StockRemoval::Reduced { .. } | StockRemoval::Emptied
                );
                let handback = match removal {
                    StockRemoval::Reduced { remaining } => Handback::new(
                        format!(
                            "Removed {} {} of {}. Remaining: {} {}.",
                            format_quantity(quantity),
                            unit,
                            name,
                            format_quantity(remaining),
                            unit
                        ),
                        json!({"action": "remove", "status": "reduced", "remaining": remaining}),
                    ),
                    StockRemoval::Emptied => Handback::new(
                        format!("Completely removed {name} ({unit}) from your pantry."),
                        json!({"action": "remove", "status": "emptied"}),
                    ),
                    StockRemoval::Insufficient { available } => Handback::new(
                        format!(
                            "Insufficient quantity of {}. Available: {} {}.",
                            name,
                            format_quantity(available),
                            unit
                        ),
                        json!({"action": "remove", "status": "insufficient", "available": available}),
                    ),
                    StockRemoval::Missing => Handback::new(
                        format!("Item {name} ({unit}) not found in your pantry."),
                        json!({"action": "remove", "status": "missing"}),
                    ),
                };
                (handback, changed)
            }
            PantryAction::Check { name } => {
                let handback = match profile.find_stock(&name) {
                    Some(item) => Handback::new(
                        format!(
                            "{} ({} {}) is in your pantry.",
                            item.name,
                            format_quantity(item.quantity),
                            item.unit
                        ),
                        json!({"action": "check", "found": true, "item": item}),
                    ),
                    None => Handback::new(
                        format!("{name} not found in your pantry."),
                        json!({"action": "check", "found": false}),
                    ),
                };
                (handback, false)
            }
            PantryAction::List => {
                let handback = if profile.inventory.is_empty() {
                    Handback::new(
                        "Your pantry is currently empty.",
                        json!({"action": "list", "pantry": []}),
                    )
                } else {
                    let lines: Vec<String> =
                        profile.inventory.iter().map(ToString::to_string).collect();
                    Handback::new(
                        format!("Here are your current pantry items:\n- {}", lines.join("\n- ")),
                        json!({"action": "list", "pantry": profile.inventory}),
                    )
                };
                (handback, false)
            }
        }
    }
}

impl Default for PantrySpecialist {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Specialist for PantrySpecialist {
    fn id(&self) -> SpecialistId {
        SpecialistId::Pantry
    }

    async fn handle(
        &self,
        request: SpecialistRequest<'_>,
    ) -> Result<SpecialistOutcome, SpecialistError> {
        match parse_request(request.query) {
            ParsedRequest::NeedsDetail(question) => Ok(SpecialistOutcome::Clarification(question)),
            ParsedRequest::Action(action) => {
                debug!(?action, "Applying pantry action");
                let mut profile = request.state.profile()?;
                let (handback, changed) = self.apply(action, &mut profile);
                if changed {
                    request.state.put_profile(&profile)?;
                }
                Ok(SpecialistOutcome::Handback(handback))
            }
        }
    }
}
