//! Pantry domain entities: ingredients, stock operations, user profile

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::DomainError;

/// Normalized ingredient identity (Value Object)
///
/// Two ingredient entries refer to the same stock exactly when their
/// lowercased, trimmed name and unit agree. `"Soy Sauce" / "tbsp"` and
/// `"soy sauce " / "Tbsp"` match; `"soy sauce" / "ml"` does not. There
/// is no unit conversion anywhere in the domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IngredientKey {
    name: String,
    unit: String,
}

impl IngredientKey {
    pub fn of(name: &str, unit: &str) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            unit: unit.trim().to_lowercase(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Name-only match, used by stock lookups that ignore the unit
    pub fn same_name(&self, name: &str) -> bool {
        self.name == name.trim().to_lowercase()
    }
}

/// A quantified ingredient (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn key(&self) -> IngredientKey {
        IngredientKey::of(&self.name, &self.unit)
    }
}

impl std::fmt::Display for Ingredient {
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

/// Format a quantity without a trailing `.0` for whole numbers
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 && quantity.abs() < 1e15 {
        format!("{}", quantity as i64)
    } else {
        format!("{quantity}")
    }
}

/// Outcome of adding stock to the pantry
#[derive(Debug, Clone, PartialEq)]
pub enum StockChange {
    /// Merged into an existing entry with the same name and unit
    Topped { total: f64 },
    /// New entry appended
    Added,
}

/// Outcome of taking stock out of the pantry
#[derive(Debug, Clone, PartialEq)]
pub enum StockRemoval {
    /// Partial removal; the entry stays with the remaining quantity
    Reduced { remaining: f64 },
    /// Exact removal; the entry is gone
    Emptied,
    /// More requested than tracked; nothing changed
    Insufficient { available: f64 },
    /// No entry with that name and unit
    Missing,
}

/// A user's identity, preferences, and tracked pantry inventory (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub preferences: serde_json::Map<String, Value>,
    #[serde(default)]
    pub inventory: Vec<Ingredient>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            preferences: serde_json::Map::new(),
            inventory: Vec::new(),
        }
    }

    /// The default profile seeded into brand-new sessions: a sample
    /// vegetarian-friendly household with a lightly stocked kitchen.
    pub fn starter() -> Self {
        let mut preferences = serde_json::Map::new();
        preferences.insert(
            "dietary_restrictions".to_string(),
            Value::Array(vec![Value::String("vegetarian_friendly".to_string())]),
        );
        preferences.insert(
            "favorite_cuisine".to_string(),
            Value::String("Italian".to_string()),
        );

        Self {
            user_id: "default_user_001".to_string(),
            preferences,
            inventory: vec![
                Ingredient::new("Eggs", 6.0, "pieces"),
                Ingredient::new("Milk", 1.0, "liter"),
                Ingredient::new("Bread", 1.0, "loaf"),
                Ingredient::new("Butter", 250.0, "grams"),
                Ingredient::new("Tomato", 3.0, "pieces").with_notes("Roma tomatoes"),
                Ingredient::new("Onion", 2.0, "pieces"),
                Ingredient::new("Garlic", 1.0, "head"),
                Ingredient::new("Pasta", 500.0, "grams").with_notes("Spaghetti"),
                Ingredient::new("Olive Oil", 250.0, "ml").with_notes("Extra Virgin"),
            ],
        }
    }

    pub fn to_value(&self) -> Result<Value, DomainError> {
        serde_json::to_value(self)
            .map_err(|e| DomainError::serialization("user profile", e.to_string()))
    }

    /// Dietary restriction strings from the preference map, if any
    pub fn dietary_restrictions(&self) -> Vec<String> {
        match self.preferences.get("dietary_restrictions") {
            Some(Value::Array(entries)) => entries
                .iter()
                .filter_map(|entry| entry.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn favorite_cuisine(&self) -> Option<&str> {
        self.preferences.get("favorite_cuisine")?.as_str()
    }

    /// Add stock, merging with an existing entry of the same name and unit
    pub fn add_stock(&mut self, item: Ingredient) -> StockChange {
        let key = item.key();
        for existing in &mut self.inventory {
            if existing.key() == key {
                existing.quantity += item.quantity;
                return StockChange::Topped {
                    total: existing.quantity,
                };
            }
        }
        self.inventory.push(item);
        StockChange::Added
    }

    /// Take stock out; an exact match on the tracked quantity removes the
    /// entry entirely, asking for more than is tracked changes nothing.
    pub fn take_stock(&mut self, name: &str, quantity: f64, unit: &str) -> StockRemoval {
        let key = IngredientKey::of(name, unit);
        let Some(index) = self.inventory.iter().position(|item| item.key() == key) else {
            return StockRemoval::Missing;
        };
        let available = self.inventory[index].quantity;
        if quantity > available {
            StockRemoval::Insufficient { available }
        } else if quantity == available {
            self.inventory.remove(index);
            StockRemoval::Emptied
        } else {
            self.inventory[index].quantity -= quantity;
            StockRemoval::Reduced {
                remaining: self.inventory[index].quantity,
            }
        }
    }

    /// First inventory entry matching the name, any unit
    pub fn find_stock(&self, name: &str) -> Option<&Ingredient> {
        self.inventory.iter().find(|item| item.key().same_name(name))
    }
}
