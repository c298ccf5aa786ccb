//! Session module: per-conversation state and its well-known keys

pub mod keys;
pub mod state;

pub use state::{ChatTurn, Rendered, SessionState};
