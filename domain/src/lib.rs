//! Domain layer for majordomo
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Handoff
//!
//! One coordinator fronts a staff of specialists. Each user turn is
//! classified and either answered directly, met with a single clarifying
//! question, or delegated to exactly one specialist, which returns a
//! handback (announcement + structured data) or its own clarifying
//! question. The user only ever sees the coordinator.
//!
//! ## Session state
//!
//! Everything conversational lives in an insertion-ordered key → Value map
//! per session: the user profile with its pantry inventory, the chat
//! history, presented recipes, shopping lists, and tasks.

pub mod core;
pub mod handoff;
pub mod pantry;
pub mod recipe;
pub mod session;
pub mod shopping;
pub mod tasks;

// Re-export commonly used types
pub use crate::core::error::DomainError;
pub use handoff::{
    entities::{DirectCommand, Handback, Route, SpecialistId, SpecialistOutcome},
    phase::{TurnMachine, TurnPhase},
};
pub use pantry::entities::{
    format_quantity, Ingredient, IngredientKey, StockChange, StockRemoval, UserProfile,
};
pub use recipe::{Recipe, RecipeSummary};
pub use session::{
    keys,
    state::{ChatTurn, Rendered, SessionState},
};
pub use shopping::{reconcile, ShoppingList, ShoppingListItem};
pub use tasks::{HouseholdTask, TaskStatus};
