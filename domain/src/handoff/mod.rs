//! Handoff module: the coordinator/specialist protocol

pub mod entities;
pub mod phase;

pub use entities::{DirectCommand, Handback, Route, SpecialistId, SpecialistOutcome};
pub use phase::{TurnMachine, TurnPhase};
