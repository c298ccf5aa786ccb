//! Pantry module: ingredients, user profile, and stock bookkeeping

pub mod entities;

pub use entities::{
    format_quantity, Ingredient, IngredientKey, StockChange, StockRemoval, UserProfile,
};
