//! Intent classifier adapters.

mod keyword;

pub use keyword::KeywordIntentClassifier;
