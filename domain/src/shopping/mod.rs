//! Shopping list reconciliation
//!
//! Compares what a recipe requires against what the pantry tracks and
//! emits only the shortfall. Matching is by normalized (name, unit) key;
//! nothing here converts units, so `100 ml` of soy sauce never satisfies
//! a requirement stated in tablespoons.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::DomainError;
use crate::pantry::{format_quantity, Ingredient, IngredientKey};
use crate::recipe::Recipe;

/// One line of a shopping list: the missing portion of a requirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ShoppingListItem {
    /// Build a line for `shortfall` of a required ingredient, keeping the
    /// requirement's original casing and notes.
    fn shortfall_of(required: &Ingredient, shortfall: f64) -> Self {
        Self {
            name: required.name.clone(),
            quantity: shortfall,
            unit: required.unit.clone(),
            notes: required.notes.clone(),
        }
    }
}

impl std::fmt::Display for ShoppingListItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} of {}",
            format_quantity(self.quantity),
            self.unit,
            self.name
        )?;
        if let Some(notes) = &self.notes {
            write!(f, " ({notes})")?;
        }
        Ok(())
    }
}

/// The reconciled shortfall for one recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_title: Option<String>,
    pub items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    pub fn for_recipe(recipe: &Recipe, available: &[Ingredient]) -> Self {
        Self {
            recipe_title: Some(recipe.name.clone()),
            items: reconcile(&recipe.ingredients, available),
        }
    }

    /// Everything required is already tracked in sufficient quantity
    pub fn is_covered(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_value(&self) -> Result<Value, DomainError> {
        serde_json::to_value(self)
            .map_err(|e| DomainError::serialization("shopping list", e.to_string()))
    }
}

/// Reconcile required ingredients against available stock.
///
/// Available quantities are aggregated by key on a scratch copy, then
/// consumed in `required` order, so a later duplicate requirement sees only
/// what earlier lines left behind. Quantities on emitted lines are always
/// positive; fully covered and zero-quantity requirements emit nothing.
pub fn reconcile(required: &[Ingredient], available: &[Ingredient]) -> Vec<ShoppingListItem> {
    let mut stock: HashMap<IngredientKey, f64> = HashMap::new();
    for item in available {
        *stock.entry(item.key()).or_insert(0.0) += item.quantity;
    }

    let mut missing = Vec::new();
    for need in required {
        if need.quantity <= 0.0 {
            continue;
        }
        let have = stock.entry(need.key()).or_insert(0.0);
        if *have >= need.quantity {
            *have -= need.quantity;
        } else {
            let shortfall = need.quantity - *have;
            *have = 0.0;
            missing.push(ShoppingListItem::shortfall_of(need, shortfall));
        }
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ing(name: &str, quantity: f64, unit: &str) -> Ingredient {
        Ingredient::new(name, quantity, unit)
    }

    #[test]
    fn test_stir_fry_shortfall() {
        let required = vec![
            ing("chicken", 2.0, "pieces"),
            ing("broccoli", 1.0, "head"),
            ing("soy sauce", 3.0, "tbsp"),
            ing("garlic", 2.0, "cloves"),
            ing("olive oil", 1.0, "tbsp"),
        ];
        let available = vec![
            ing("broccoli", 0.5, "head"),
            ing("soy sauce", 100.0, "ml"),
            ing("garlic", 5.0, "cloves"),
            ing("onion", 3.0, "pieces"),
        ];

        let list = reconcile(&required, &available);

        assert_eq!(list.len(), 4);
        assert_eq!(list[0], ShoppingListItem::shortfall_of(&required[0], 2.0));
        assert_eq!(list[1], ShoppingListItem::shortfall_of(&required[1], 0.5));
        // ml on hand never satisfies tbsp: the full 3 tbsp goes on the list
        assert_eq!(list[2], ShoppingListItem::shortfall_of(&required[2], 3.0));
        assert_eq!(list[3], ShoppingListItem::shortfall_of(&required[4], 1.0));
    }

    #[test]
    fn test_names_and_units_compared_case_insensitively() {
        let required = vec![ing("Soy Sauce", 2.0, "Tbsp")];
        let available = vec![ing("  soy sauce ", 5.0, "tbsp")];
        assert!(reconcile(&required, &available).is_empty());
    }

    #[test]
    fn test_emitted_lines_keep_required_casing_and_notes() {
        let required = vec![ing("Chicken Breast", 2.0, "Pieces").with_notes("skinless, boneless")];
        let available = vec![ing("chicken breast", 0.5, "pieces")];

        let list = reconcile(&required, &available);
        assert_eq!(list[0].name, "Chicken Breast");
        assert_eq!(list[0].unit, "Pieces");
        assert_eq!(list[0].quantity, 1.5);
        assert_eq!(list[0].notes.as_deref(), Some("skinless, boneless"));
    }

    #[test]
    fn test_duplicate_available_entries_aggregate_before_subtraction() {
        let required = vec![ing("garlic", 3.0, "cloves")];
        let available = vec![ing("garlic", 1.0, "cloves"), ing("Garlic", 2.0, "cloves")];
        assert!(reconcile(&required, &available).is_empty());
    }

    #[test]
    fn test_duplicate_requirements_consume_shared_stock() {
        let required = vec![ing("butter", 100.0, "grams"), ing("butter", 100.0, "grams")];
        let available = vec![ing("butter", 150.0, "grams")];

        let list = reconcile(&required, &available);
        // The first line is fully covered; the second sees only 50 g left
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].quantity, 50.0);
    }

    #[test]
    fn test_zero_quantity_requirement_emits_nothing() {
        let required = vec![ing("salt", 0.0, "pinch"), ing("pepper", 1.0, "pinch")];
        let list = reconcile(&required, &[]);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "pepper");
    }

    #[test]
    fn test_output_follows_required_order() {
        let required = vec![
            ing("cumin", 1.0, "tsp"),
            ing("paprika", 1.0, "tsp"),
            ing("oregano", 1.0, "tsp"),
        ];
        let names: Vec<String> = reconcile(&required, &[])
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(names, vec!["cumin", "paprika", "oregano"]);
    }

    #[test]
    fn test_quantity_conservation() {
        // Whatever is not on the list must have been covered by stock:
        // shortfall + consumed == required, per key.
        let required = vec![ing("rice", 300.0, "grams"), ing("rice", 200.0, "grams")];
        let available = vec![ing("rice", 350.0, "grams")];

        let list = reconcile(&required, &available);
        let shortfall: f64 = list.iter().map(|item| item.quantity).sum();
        assert_eq!(shortfall, 150.0);
        assert!(list.iter().all(|item| item.quantity > 0.0));
    }

    #[test]
    fn test_shopping_list_for_recipe() {
        let recipe = Recipe::new("Buttered Toast")
            .with_ingredient(ing("bread", 2.0, "slices"))
            .with_ingredient(ing("butter", 20.0, "grams"));
        let available = vec![ing("butter", 250.0, "grams")];

        let list = ShoppingList::for_recipe(&recipe, &available);
        assert_eq!(list.recipe_title.as_deref(), Some("Buttered Toast"));
        assert!(!list.is_covered());
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].name, "bread");
    }
}
