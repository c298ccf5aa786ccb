//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface for Majordomo.

mod repl;

pub use repl::ChatRepl;
