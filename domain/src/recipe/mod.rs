//! Recipe domain entities

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::DomainError;
use crate::pantry::Ingredient;

/// A cooking recipe (Entity)
///
/// Times and servings stay free-form strings ("15 minutes", "2-3");
/// they are presented, never computed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            prep_time: None,
            cook_time: None,
            servings: None,
        }
    }

    pub fn with_ingredient(mut self, ingredient: Ingredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    pub fn with_instruction(mut self, step: impl Into<String>) -> Self {
        self.instructions.push(step.into());
        self
    }

    pub fn with_times(
        mut self,
        prep_time: impl Into<String>,
        cook_time: impl Into<String>,
    ) -> Self {
        self.prep_time = Some(prep_time.into());
        self.cook_time = Some(cook_time.into());
        self
    }

    pub fn with_servings(mut self, servings: impl Into<String>) -> Self {
        self.servings = Some(servings.into());
        self
    }

    pub fn to_value(&self) -> Result<Value, DomainError> {
        serde_json::to_value(self).map_err(|e| DomainError::serialization("recipe", e.to_string()))
    }

    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        serde_json::from_value(value)
            .map_err(|e| DomainError::serialization("recipe", e.to_string()))
    }
}

/// Compact reference to a saved recipe, kept in the session's saved list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: String,
    pub name: String,
}

impl RecipeSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn to_value(&self) -> Result<Value, DomainError> {
        serde_json::to_value(self)
            .map_err(|e| DomainError::serialization("recipe summary", e.to_string()))
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}
