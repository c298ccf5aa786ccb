//! Conversation session state
//!
//! [`SessionState`] is an insertion-ordered key → [`Value`] map with one
//! normalization rule applied at this boundary and nowhere else: a string
//! written into the state is parsed as JSON when it parses, so structured
//! data always lives (and compares) in its structural form, regardless
//! of whether a caller supplied `{"id":"1"}` or its serialized text.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::DomainError;
use crate::pantry::UserProfile;
use crate::session::keys;

/// One user/assistant exchange kept in the chat history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub assistant: String,
    pub at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
            at: Utc::now(),
        }
    }
}

/// A value read back for external exposure.
///
/// Lists and records are re-serialized to JSON text; scalars pass through
/// untouched. Serialization trouble is reported, not swallowed: the caller
/// still gets a best-effort string alongside the failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Scalar(Value),
    Json(String),
    Fallback { text: String, error: String },
}

impl Rendered {
    /// The text a conversational caller would show, whatever the shape
    pub fn as_text(&self) -> String {
        match self {
            Rendered::Scalar(Value::String(text)) => text.clone(),
            Rendered::Scalar(other) => other.to_string(),
            Rendered::Json(json) => json.clone(),
            Rendered::Fallback { text, .. } => text.clone(),
        }
    }
}

/// Per-conversation state (Entity)
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SessionState {
    entries: IndexMap<String, Value>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON-literal string into structural form; leave everything
    /// else as-is. Applied on every write path.
    fn coerce(value: Value) -> Value {
        match value {
            Value::String(text) => match serde_json::from_str(&text) {
                Ok(parsed) => parsed,
                Err(_) => Value::String(text),
            },
            other => other,
        }
    }

    /// Unconditional overwrite
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), Self::coerce(value));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Length of the list under `key`, 0 when absent or not a list
    pub fn list_len(&self, key: &str) -> usize {
        match self.entries.get(key) {
            Some(Value::Array(list)) => list.len(),
            _ => 0,
        }
    }

    /// Append `item` to the list under `key` unless a structurally equal
    /// element is already present. A missing or non-list key becomes a
    /// fresh list. Returns whether an append happened.
    pub fn append_unique(&mut self, key: &str, item: Value) -> bool {
        let item = Self::coerce(item);
        let slot = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(list) = slot {
            if list.contains(&item) {
                false
            } else {
                list.push(item);
                true
            }
        } else {
            *slot = Value::Array(vec![item]);
            true
        }
    }

    /// Remove the first element structurally equal to `item` from the list
    /// under `key`. Returns false when the key is absent, not a list, or
    /// holds no match.
    pub fn remove_item(&mut self, key: &str, item: &Value) -> bool {
        let target = Self::coerce(item.clone());
        match self.entries.get_mut(key) {
            Some(Value::Array(list)) => match list.iter().position(|existing| *existing == target) {
                Some(index) => {
                    list.remove(index);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Plain list append, used for streams like the chat history where
    /// equal entries are legitimate.
    fn push(&mut self, key: &str, item: Value) {
        let slot = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(list) = slot {
            list.push(item);
        } else {
            *slot = Value::Array(vec![item]);
        }
    }

    /// Read a value for external exposure
    pub fn rendered(&self, key: &str) -> Option<Rendered> {
        let value = self.entries.get(key)?;
        Some(match value {
            Value::Array(_) | Value::Object(_) => match serde_json::to_string(value) {
                Ok(json) => Rendered::Json(json),
                Err(error) => Rendered::Fallback {
                    text: format!("{value:?}"),
                    error: error.to_string(),
                },
            },
            scalar => Rendered::Scalar(scalar.clone()),
        })
    }

    /// Seed a brand-new session: profile and an empty chat history, each
    /// only when absent. Safe to call on every turn.
    pub fn initialize(&mut self, profile: &UserProfile) -> Result<(), DomainError> {
        if !self.contains(keys::USER_PROFILE) {
            self.set(keys::USER_PROFILE, profile.to_value()?);
        }
        if !self.contains(keys::CHAT_HISTORY) {
            self.set(keys::CHAT_HISTORY, Value::Array(Vec::new()));
        }
        Ok(())
    }

    pub fn profile(&self) -> Result<UserProfile, DomainError> {
        let value = self
            .get(keys::USER_PROFILE)
            .ok_or_else(|| DomainError::not_found("user profile", keys::USER_PROFILE))?;
        serde_json::from_value(value.clone())
            .map_err(|e| DomainError::serialization("user profile", e.to_string()))
    }

    pub fn put_profile(&mut self, profile: &UserProfile) -> Result<(), DomainError> {
        self.set(keys::USER_PROFILE, profile.to_value()?);
        Ok(())
    }

    /// Append a finished exchange to the chat history, dropping the oldest
    /// entries beyond `limit` (0 disables the cap).
    pub fn record_turn(&mut self, turn: &ChatTurn, limit: usize) -> Result<(), DomainError> {
        let entry = serde_json::to_value(turn)
            .map_err(|e| DomainError::serialization("chat turn", e.to_string()))?;
        self.push(keys::CHAT_HISTORY, entry);
        if limit > 0
            && let Some(Value::Array(history)) = self.entries.get_mut(keys::CHAT_HISTORY)
            && history.len() > limit
        {
            let excess = history.len() - limit;
            history.drain(..excess);
        }
        Ok(())
    }

    /// Pretty JSON of the whole state, keys in insertion order
    pub fn dump_json(&self) -> Result<String, DomainError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DomainError::serialization("session state", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_round_trip() {
        let mut state = SessionState::new();
        state.set("note", json!("remember the milk"));
        assert_eq!(state.get("note"), Some(&json!("remember the milk")));
        assert!(state.get("absent").is_none());
    }

    #[test]
    fn test_set_parses_json_literal_strings() {
        let mut state = SessionState::new();
        state.set("profile", json!(r#"{"user_id":"u1"}"#));
        state.set("count", json!("42"));
        state.set("plain", json!("just words"));

        assert_eq!(state.get("profile"), Some(&json!({"user_id": "u1"})));
        assert_eq!(state.get("count"), Some(&json!(42)));
        assert_eq!(state.get("plain"), Some(&json!("just words")));
    }

    #[test]
    fn test_set_overwrites() {
        let mut state = SessionState::new();
        state.set("k", json!(1));
        state.set("k", json!(2));
        assert_eq!(state.get("k"), Some(&json!(2)));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_append_unique_is_idempotent() {
        let mut state = SessionState::new();
        let summary = json!({"id": "r-1", "name": "Toast"});

        assert!(state.append_unique("saved_recipes_list", summary.clone()));
        assert!(!state.append_unique("saved_recipes_list", summary.clone()));
        assert_eq!(state.list_len("saved_recipes_list"), 1);
    }

    #[test]
    fn test_append_unique_compares_parsed_form() {
        let mut state = SessionState::new();
        state.append_unique("saved", json!({"id": "r-1", "name": "Toast"}));
        // The serialized text of the same record is the same element
        let appended = state.append_unique("saved", json!(r#"{"id":"r-1","name":"Toast"}"#));
        assert!(!appended);
        assert_eq!(state.list_len("saved"), 1);
    }

    #[test]
    fn test_append_unique_replaces_non_list_value() {
        let mut state = SessionState::new();
        state.set("things", json!("not a list"));
        assert!(state.append_unique("things", json!("first")));
        assert_eq!(state.get("things"), Some(&json!(["first"])));
    }

    #[test]
    fn test_remove_item_first_match_only() {
        let mut state = SessionState::new();
        state.set("nums", json!([1, 2, 1]));
        assert!(state.remove_item("nums", &json!(1)));
        assert_eq!(state.get("nums"), Some(&json!([2, 1])));
    }

    #[test]
    fn test_remove_item_parses_json_literal() {
        let mut state = SessionState::new();
        state.append_unique("saved", json!({"id": "r-1", "name": "Toast"}));
        assert!(state.remove_item("saved", &json!(r#"{"id":"r-1","name":"Toast"}"#)));
        assert_eq!(state.list_len("saved"), 0);
    }

    #[test]
    fn test_remove_item_reports_not_found() {
        let mut state = SessionState::new();
        assert!(!state.remove_item("absent", &json!(1)));

        state.set("scalar", json!(7));
        assert!(!state.remove_item("scalar", &json!(7)));

        state.set("nums", json!([1, 2]));
        assert!(!state.remove_item("nums", &json!(3)));
    }

    #[test]
    fn test_rendered_scalars_pass_through() {
        let mut state = SessionState::new();
        state.set("plain", json!("hello"));
        state.set("flag", json!(true));

        assert_eq!(
            state.rendered("plain"),
            Some(Rendered::Scalar(json!("hello")))
        );
        assert_eq!(state.rendered("flag"), Some(Rendered::Scalar(json!(true))));
        assert!(state.rendered("absent").is_none());
    }

    #[test]
    fn test_rendered_serializes_complex_values() {
        let mut state = SessionState::new();
        state.set("record", json!({"id": "r-1"}));

        let Some(Rendered::Json(text)) = state.rendered("record") else {
            panic!("expected JSON rendering");
        };
        assert_eq!(text, r#"{"id":"r-1"}"#);
    }

    #[test]
    fn test_rendered_as_text() {
        assert_eq!(Rendered::Scalar(json!("hi")).as_text(), "hi");
        assert_eq!(Rendered::Scalar(json!(42)).as_text(), "42");
        assert_eq!(Rendered::Json("[1]".to_string()).as_text(), "[1]");
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut state = SessionState::new();
        state.initialize(&UserProfile::starter()).unwrap();

        // Mutate the stored profile, then initialize again
        let mut profile = state.profile().unwrap();
        profile.inventory.clear();
        state.put_profile(&profile).unwrap();
        state.initialize(&UserProfile::starter()).unwrap();

        assert!(state.profile().unwrap().inventory.is_empty());
        assert_eq!(state.list_len(keys::CHAT_HISTORY), 0);
    }

    #[test]
    fn test_profile_round_trip() {
        let mut state = SessionState::new();
        let profile = UserProfile::starter();
        state.put_profile(&profile).unwrap();
        assert_eq!(state.profile().unwrap(), profile);
    }

    #[test]
    fn test_profile_missing_is_not_found() {
        let state = SessionState::new();
        assert!(state.profile().unwrap_err().is_not_found());
    }

    #[test]
    fn test_record_turn_appends_and_caps() {
        let mut state = SessionState::new();
        state.initialize(&UserProfile::starter()).unwrap();

        for i in 0..5 {
            let turn = ChatTurn::new(format!("q{i}"), format!("a{i}"));
            state.record_turn(&turn, 3).unwrap();
        }

        assert_eq!(state.list_len(keys::CHAT_HISTORY), 3);
        let Some(Value::Array(history)) = state.get(keys::CHAT_HISTORY) else {
            panic!("history must be a list");
        };
        assert_eq!(history[0]["user"], json!("q2"));
        assert_eq!(history[2]["assistant"], json!("a4"));
    }

    #[test]
    fn test_identical_turns_both_recorded() {
        let mut state = SessionState::new();
        let turn = ChatTurn::new("hi", "hello");
        state.record_turn(&turn, 0).unwrap();
        state.record_turn(&turn, 0).unwrap();
        assert_eq!(state.list_len(keys::CHAT_HISTORY), 2);
    }

    #[test]
    fn test_dump_preserves_insertion_order() {
        let mut state = SessionState::new();
        state.set("zulu", json!(1));
        state.set("alpha", json!(2));
        state.set("mike", json!(3));

        let dump = state.dump_json().unwrap();
        let zulu = dump.find("zulu").unwrap();
        let alpha = dump.find("alpha").unwrap();
        let mike = dump.find("mike").unwrap();
        assert!(zulu < alpha && alpha < mike);
    }
}
