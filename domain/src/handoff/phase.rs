//! Turn phase state machine
//!
//! Every user message drives one pass: Idle → Classifying → one of the
//! three intent branches → Responding → Idle. A turn produces exactly one
//! user-visible message, whichever branch it takes.

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;

/// Phase of a conversational turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    Idle,
    Classifying,
    AnsweringDirectly,
    AwaitingClarification,
    Delegated,
    AwaitingHandback,
    Responding,
}

impl TurnPhase {
    pub fn as_str(&self) -> &str {
        match self {
            TurnPhase::Idle => "idle",
            TurnPhase::Classifying => "classifying",
            TurnPhase::AnsweringDirectly => "answering_directly",
            TurnPhase::AwaitingClarification => "awaiting_clarification",
            TurnPhase::Delegated => "delegated",
            TurnPhase::AwaitingHandback => "awaiting_handback",
            TurnPhase::Responding => "responding",
        }
    }

    /// Legality table for phase transitions.
    ///
    /// Classifying and Delegated may jump straight to Responding when a
    /// collaborator fails; the turn still answers with exactly one
    /// message, just a generic one.
    pub fn can_advance(self, next: TurnPhase) -> bool {
        use TurnPhase::*;
        matches!(
            (self, next),
            (Idle, Classifying)
                | (Classifying, AnsweringDirectly)
                | (Classifying, AwaitingClarification)
                | (Classifying, Delegated)
                | (Classifying, Responding)
                | (Delegated, AwaitingClarification)
                | (Delegated, AwaitingHandback)
                | (Delegated, Responding)
                | (AnsweringDirectly, Responding)
                | (AwaitingClarification, Responding)
                | (AwaitingHandback, Responding)
                | (Responding, Idle)
        )
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks phase progression through one turn
#[derive(Debug, Clone)]
pub struct TurnMachine {
    phase: TurnPhase,
}

impl TurnMachine {
    pub fn new() -> Self {
        Self {
            phase: TurnPhase::Idle,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn advance(&mut self, next: TurnPhase) -> Result<TurnPhase, DomainError> {
        if self.phase.can_advance(next) {
            self.phase = next;
            Ok(next)
        } else {
            Err(DomainError::validation(
                "turn_phase",
                format!("illegal transition {} -> {}", self.phase, next),
            ))
        }
    }
}

impl Default for TurnMachine {
    fn default() -> Self {
        Self::new()
    }
}
