//! Language gateway adapters.

mod canned;

pub use canned::CannedLanguageGateway;
