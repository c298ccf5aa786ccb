//! Handoff protocol entities: the contract between the coordinator and
//! its specialists.
//!
//! A specialist finishes a delegation in exactly one of two ways: a
//! [`Handback`] (announcement plus structured data) or a clarifying
//! question shown to the user verbatim. Control always returns by plain
//! function return; specialists never address the user directly and never
//! call back into the coordinator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a specialist the coordinator can delegate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialistId {
    Recipe,
    Pantry,
    Dietary,
    Tasks,
    Persona,
}

impl SpecialistId {
    pub fn as_str(&self) -> &str {
        match self {
            SpecialistId::Recipe => "recipe",
            SpecialistId::Pantry => "pantry",
            SpecialistId::Dietary => "dietary",
            SpecialistId::Tasks => "tasks",
            SpecialistId::Persona => "persona",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            SpecialistId::Recipe => "Recipe",
            SpecialistId::Pantry => "Pantry",
            SpecialistId::Dietary => "Dietary Advice",
            SpecialistId::Tasks => "Task Tracking",
            SpecialistId::Persona => "Persona",
        }
    }

    pub fn all() -> [SpecialistId; 5] {
        [
            SpecialistId::Recipe,
            SpecialistId::Pantry,
            SpecialistId::Dietary,
            SpecialistId::Tasks,
            SpecialistId::Persona,
        ]
    }

    /// Whether a handback from this specialist is stored under a fresh
    /// recipe id for later saving and shopping-list generation.
    pub fn persists_handback(&self) -> bool {
        matches!(self, SpecialistId::Recipe)
    }
}

impl std::fmt::Display for SpecialistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A completed piece of specialist work (Value Object)
///
/// The announcement is the user-facing reply and must never contain a
/// question or an error. `data` arrives untyped from the language
/// boundary; the coordinator validates it before relaying or persisting.
#[derive(Debug, Clone, PartialEq)]
pub struct Handback {
    pub announcement: String,
    pub data: Value,
}

impl Handback {
    pub fn new(announcement: impl Into<String>, data: Value) -> Self {
        Self {
            announcement: announcement.into(),
            data,
        }
    }

    /// The structured data as a record, when it is one
    pub fn record(&self) -> Option<&serde_json::Map<String, Value>> {
        self.data.as_object()
    }

    /// A non-blank announcement with record-typed data
    pub fn is_well_formed(&self) -> bool {
        !self.announcement.trim().is_empty() && self.data.is_object()
    }
}

/// The only two ways a delegation can finish
#[derive(Debug, Clone, PartialEq)]
pub enum SpecialistOutcome {
    /// Terminal question, relayed to the user verbatim
    Clarification(String),
    /// Completed work to announce and possibly persist
    Handback(Handback),
}

/// Where a classified turn goes next
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// The coordinator answers directly with this text
    Answer(String),
    /// The coordinator needs more information; terminal for the turn
    Clarify(String),
    /// Hand the turn to exactly one specialist
    Delegate(SpecialistId),
    /// A command the coordinator executes itself
    Command(DirectCommand),
}

/// Commands the coordinator executes without delegating
#[derive(Debug, Clone, PartialEq)]
pub enum DirectCommand {
    /// Persist the most recently presented recipe
    SaveRecipe,
    /// Reconcile a saved recipe against the pantry; `recipe` may be an id
    /// or a name, defaulting to the most recently saved
    BuildShoppingList { recipe: Option<String> },
    /// Report how many recipes the user has saved
    CountSavedRecipes,
}
