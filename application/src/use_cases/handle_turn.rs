//! Turn orchestration use case
//!
//! One pass of the coordinator per user message: open the session, hold
//! its lock for the whole turn, classify the query, then answer directly,
//! ask one clarifying question, run a coordinator command, or delegate to
//! exactly one specialist. Every turn ends with exactly one user-visible
//! text; specialist failures never escape as errors.
//!
//! The phase bookkeeping runs through [`TurnMachine`], so an out-of-order
//! step is caught (and logged) instead of silently producing a second
//! reply or a half-finished turn.

use std::sync::Arc;

use chrono::Utc;
use majordomo_domain::{
    keys, ChatTurn, DirectCommand, Recipe, RecipeSummary, Route, SessionState, ShoppingList,
    SpecialistOutcome, TurnMachine, TurnPhase,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::BehaviorConfig;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::intent_classifier::IntentClassifier;
use crate::ports::record_store::RecordStore;
use crate::ports::session_store::{SessionStore, SessionStoreError};
use crate::specialists::{SpecialistRegistry, SpecialistRequest};

/// Durable collection holding saved recipes
const RECIPES_COLLECTION: &str = "recipes";

/// Reply for a rejected handback, verbatim whatever went wrong with it
pub const DETAILS_APOLOGY: &str =
    "I'm having a little trouble getting the details right now. Could you try asking again?";

/// Reply when a collaborator or specialist fails outright
pub const GENERIC_FAILURE: &str =
    "I'm sorry, something went wrong on my end while handling that. Please try again.";

/// One user message aimed at the coordinator
#[derive(Debug, Clone)]
pub struct HandleTurnInput {
    pub query: String,
    /// Omitted or unknown ids both produce a usable session; the id that
    /// was actually used comes back in the reply.
    pub session_id: Option<String>,
}

impl HandleTurnInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// The single user-visible outcome of a turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReply {
    pub session_id: String,
    pub text_response: String,
    pub structured_output: Option<Value>,
    /// Present when the turn was answered with an apology; the text is
    /// diagnostic, never shown to the user.
    pub error_message: Option<String>,
}

impl TurnReply {
    fn text(session_id: &str, text: impl Into<String>) -> Self {
        Self {
            session_id: session_id.to_string(),
            text_response: text.into(),
            structured_output: None,
            error_message: None,
        }
    }

    fn failed(session_id: &str, text: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            session_id: session_id.to_string(),
            text_response: text.into(),
            structured_output: None,
            error_message: Some(error.into()),
        }
    }

    fn with_structured(mut self, value: Value) -> Self {
        self.structured_output = Some(value);
        self
    }
}

/// Errors that end a turn before any reply exists
#[derive(Error, Debug)]
pub enum TurnError {
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Session error: {0}")]
    Session(#[from] SessionStoreError),
}

impl TurnError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TurnError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Use case for handling one conversational turn.
///
/// Drives the coordinator state machine:
/// 1. Open the session and hold its lock for the whole turn
/// 2. Classify the query into a route
/// 3. Answer, clarify, run a command, or delegate to one specialist
/// 4. Validate any handback, persist what calls for persistence
/// 5. Record the exchange and reply with exactly one text
pub struct HandleTurnUseCase {
    sessions: Arc<dyn SessionStore>,
    records: Arc<dyn RecordStore>,
    classifier: Arc<dyn IntentClassifier>,
    specialists: Arc<SpecialistRegistry>,
    conversation_logger: Arc<dyn ConversationLogger>,
    config: BehaviorConfig,
}

impl Clone for HandleTurnUseCase {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            records: self.records.clone(),
            classifier: self.classifier.clone(),
            specialists: self.specialists.clone(),
            conversation_logger: self.conversation_logger.clone(),
            config: self.config.clone(),
        }
    }
}

impl HandleTurnUseCase {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        records: Arc<dyn RecordStore>,
        classifier: Arc<dyn IntentClassifier>,
        specialists: Arc<SpecialistRegistry>,
    ) -> Self {
        Self {
            sessions,
            records,
            classifier,
            specialists,
            conversation_logger: Arc::new(NoConversationLogger),
            config: BehaviorConfig::default(),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_config(mut self, config: BehaviorConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn execute(&self, input: HandleTurnInput) -> Result<TurnReply, TurnError> {
        let query = input.query.trim();
        if query.is_empty() {
            return Err(TurnError::validation("query", "must not be empty"));
        }

        let lease = self.sessions.open(input.session_id.as_deref()).await?;
        let session_id = lease.session_id.clone();
        // Lock held until the reply is built: concurrent turns on the same
        // session serialize instead of interleaving state writes.
        let mut state = lease.state.lock().await;

        info!(session_id = %session_id, created = lease.created, "Handling turn");
        self.conversation_logger.log(ConversationEvent::new(
            "turn_received",
            json!({ "session_id": session_id, "query": query }),
        ));

        let mut machine = TurnMachine::new();
        self.advance(&mut machine, TurnPhase::Classifying);

        let profile = state.profile().ok();
        let route = match self.classifier.classify(query, profile.as_ref()).await {
            Ok(route) => route,
            Err(error) => {
                warn!(%error, "Intent classification failed");
                self.conversation_logger.log(ConversationEvent::new(
                    "turn_failed",
                    json!({ "session_id": session_id, "stage": "classify" }),
                ));
                let reply = TurnReply::failed(&session_id, GENERIC_FAILURE, error.to_string());
                return Ok(self.finish(&mut machine, &mut state, query, reply));
            }
        };

        let reply = match route {
            Route::Answer(text) => {
                self.advance(&mut machine, TurnPhase::AnsweringDirectly);
                TurnReply::text(&session_id, text)
            }
            Route::Clarify(question) => {
                self.advance(&mut machine, TurnPhase::AwaitingClarification);
                self.conversation_logger.log(ConversationEvent::new(
                    "clarification",
                    json!({ "session_id": session_id, "source": "coordinator", "question": question }),
                ));
                TurnReply::text(&session_id, question)
            }
            Route::Command(command) => {
                self.advance(&mut machine, TurnPhase::AnsweringDirectly);
                self.run_command(command, &mut state, &session_id).await
            }
            Route::Delegate(id) => {
                self.advance(&mut machine, TurnPhase::Delegated);
                self.conversation_logger.log(ConversationEvent::new(
                    "delegation",
                    json!({ "session_id": session_id, "specialist": id.as_str() }),
                ));

                let Some(specialist) = self.specialists.get(id) else {
                    warn!(specialist = id.as_str(), "No specialist registered for route");
                    let reply = TurnReply::failed(
                        &session_id,
                        GENERIC_FAILURE,
                        format!("no specialist registered for {id}"),
                    );
                    return Ok(self.finish(&mut machine, &mut state, query, reply));
                };

                let outcome = specialist
                    .handle(SpecialistRequest {
                        query,
                        session_id: &session_id,
                        state: &mut state,
                    })
                    .await;

                match outcome {
                    Err(error) => {
                        // Rule: a failed delegation is reported once and
                        // never retried within the turn.
                        warn!(%error, specialist = id.as_str(), "Specialist failed");
                        self.conversation_logger.log(ConversationEvent::new(
                            "turn_failed",
                            json!({
                                "session_id": session_id,
                                "stage": "delegate",
                                "specialist": id.as_str(),
                            }),
                        ));
                        TurnReply::failed(&session_id, GENERIC_FAILURE, error.to_string())
                    }
                    Ok(SpecialistOutcome::Clarification(question)) => {
                        self.advance(&mut machine, TurnPhase::AwaitingClarification);
                        self.conversation_logger.log(ConversationEvent::new(
                            "clarification",
                            json!({
                                "session_id": session_id,
                                "source": id.as_str(),
                                "question": question,
                            }),
                        ));
                        TurnReply::text(&session_id, question)
                    }
                    Ok(SpecialistOutcome::Handback(handback)) => {
                        self.advance(&mut machine, TurnPhase::AwaitingHandback);
                        if !handback.is_well_formed() {
                            warn!(specialist = id.as_str(), "Rejected malformed handback");
                            self.conversation_logger.log(ConversationEvent::new(
                                "handback_rejected",
                                json!({
                                    "session_id": session_id,
                                    "specialist": id.as_str(),
                                    "announcement_blank": handback.announcement.trim().is_empty(),
                                }),
                            ));
                            TurnReply::failed(&session_id, DETAILS_APOLOGY, "malformed handback")
                        } else {
                            if id.persists_handback() {
                                let recipe_id = Uuid::new_v4().to_string();
                                state.set(keys::recipe_detail(&recipe_id), handback.data.clone());
                                state.set(keys::LAST_RECIPE_ID, Value::String(recipe_id.clone()));
                                debug!(%recipe_id, "Stored presented payload in session");
                            }
                            self.conversation_logger.log(ConversationEvent::new(
                                "handback",
                                json!({ "session_id": session_id, "specialist": id.as_str() }),
                            ));
                            // The announcement is relayed exactly; the
                            // structured payload rides alongside, never
                            // re-rendered into the text.
                            TurnReply::text(&session_id, handback.announcement)
                                .with_structured(handback.data)
                        }
                    }
                }
            }
        };

        Ok(self.finish(&mut machine, &mut state, query, reply))
    }

    /// Coordinator commands: saved-recipe bookkeeping the coordinator
    /// performs itself, without delegating.
    async fn run_command(
        &self,
        command: DirectCommand,
        state: &mut SessionState,
        session_id: &str,
    ) -> TurnReply {
        match command {
            DirectCommand::SaveRecipe => self.save_recipe(state, session_id).await,
            DirectCommand::BuildShoppingList { recipe } => {
                self.build_shopping_list(recipe, state, session_id).await
            }
            DirectCommand::CountSavedRecipes => {
                let count = state.list_len(keys::SAVED_RECIPES_LIST);
                let text = match count {
                    0 => "You currently have no recipes saved.".to_string(),
                    1 => "You have 1 recipe saved.".to_string(),
                    n => format!("You have {n} recipes saved."),
                };
                TurnReply::text(session_id, text)
                    .with_structured(json!({ "saved_recipes": count }))
            }
        }
    }

    /// Persist the most recently presented recipe to the durable store and
    /// remember its {id, name} summary in the session.
    async fn save_recipe(&self, state: &mut SessionState, session_id: &str) -> TurnReply {
        let presented = state
            .get(keys::LAST_RECIPE_ID)
            .and_then(Value::as_str)
            .map(keys::recipe_detail)
            .and_then(|key| state.get(&key))
            .cloned();
        let Some(payload) = presented else {
            return TurnReply::text(
                session_id,
                "I don't see a recipe to save yet. Ask me to find one first!",
            );
        };

        let name = payload
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Untitled Recipe")
            .to_string();
        let user_id = state
            .profile()
            .map(|profile| profile.user_id)
            .unwrap_or_else(|_| "unknown_user".to_string());

        let mut record = payload;
        if let Some(fields) = record.as_object_mut() {
            fields.insert("user_id".to_string(), json!(user_id));
            fields.insert("session_id".to_string(), json!(session_id));
            fields.insert("saved_at".to_string(), json!(Utc::now().to_rfc3339()));
        }

        match self.records.store_record(RECIPES_COLLECTION, record).await {
            Ok(record_id) => {
                info!(recipe = %name, record_id = %record_id, "Saved recipe");
                match RecipeSummary::new(&record_id, &name).to_value() {
                    Ok(summary) => {
                        state.append_unique(keys::SAVED_RECIPES_LIST, summary);
                    }
                    Err(error) => warn!(%error, "Could not record recipe summary"),
                }
                TurnReply::text(
                    session_id,
                    format!("Okay, I've saved the '{name}' recipe for you!"),
                )
                .with_structured(json!({ "recipe_id": record_id, "name": name }))
            }
            Err(error) => {
                warn!(%error, "Durable store rejected the recipe");
                TurnReply::failed(
                    session_id,
                    "I'm sorry, I encountered an error while trying to save the recipe.",
                    error.to_string(),
                )
            }
        }
    }

    /// Reconcile a saved recipe against the pantry and reply with the
    /// shortfall. The stored recipe payload is read, never rewritten.
    async fn build_shopping_list(
        &self,
        reference: Option<String>,
        state: &mut SessionState,
        session_id: &str,
    ) -> TurnReply {
        let summaries = saved_summaries(state);
        let target = match &reference {
            Some(wanted) => {
                let lowered = wanted.trim().to_lowercase();
                summaries
                    .iter()
                    .find(|summary| {
                        summary.id == *wanted || summary.name.to_lowercase() == lowered
                    })
                    .cloned()
            }
            None => summaries.last().cloned(),
        };
        let Some(summary) = target else {
            let text = match reference {
                Some(wanted) => format!(
                    "Sorry, I couldn't find a saved recipe with ID '{wanted}'. Please save \
                     the recipe first or check the ID."
                ),
                None => "You haven't saved any recipes yet. Save a recipe first and I'll \
                         build the list."
                    .to_string(),
            };
            return TurnReply::text(session_id, text);
        };

        let record = match self.records.find_record(RECIPES_COLLECTION, &summary.id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                return TurnReply::text(
                    session_id,
                    format!(
                        "Sorry, I couldn't find a saved recipe with ID '{}'. Please save \
                         the recipe first or check the ID.",
                        summary.id
                    ),
                );
            }
            Err(error) => {
                warn!(%error, "Durable store lookup failed");
                return TurnReply::failed(session_id, GENERIC_FAILURE, error.to_string());
            }
        };

        let recipe = match Recipe::from_value(record) {
            Ok(recipe) => recipe,
            Err(error) => {
                warn!(%error, recipe_id = %summary.id, "Stored recipe is unreadable");
                return TurnReply::failed(
                    session_id,
                    "I found the recipe, but there was an issue reading its data to \
                     generate the shopping list.",
                    error.to_string(),
                );
            }
        };
        if recipe.ingredients.is_empty() {
            return TurnReply::text(
                session_id,
                format!(
                    "The recipe for '{}' doesn't seem to have any ingredients listed, so I \
                     can't make a shopping list.",
                    recipe.name
                ),
            );
        }

        let inventory = state
            .profile()
            .map(|profile| profile.inventory)
            .unwrap_or_default();
        let list = ShoppingList::for_recipe(&recipe, &inventory);
        let structured = match list.to_value() {
            Ok(value) => value,
            Err(error) => {
                warn!(%error, "Shopping list serialization failed");
                return TurnReply::failed(session_id, DETAILS_APOLOGY, error.to_string());
            }
        };

        state.set(keys::shopping_list(&summary.id), structured.clone());
        state.append_unique(keys::USER_SHOPPING_LISTS, json!(summary.id));

        let text = if list.is_covered() {
            format!(
                "Good news: you already have everything you need for '{}'!",
                recipe.name
            )
        } else {
            let lines: Vec<String> = list.items.iter().map(ToString::to_string).collect();
            format!(
                "Here's the shopping list for '{}':\n- {}",
                recipe.name,
                lines.join("\n- ")
            )
        };
        TurnReply::text(session_id, text).with_structured(structured)
    }

    /// Wrap up: record the exchange, log the reply, return to idle.
    fn finish(
        &self,
        machine: &mut TurnMachine,
        state: &mut SessionState,
        query: &str,
        reply: TurnReply,
    ) -> TurnReply {
        self.advance(machine, TurnPhase::Responding);

        let turn = ChatTurn::new(query, reply.text_response.clone());
        if let Err(error) = state.record_turn(&turn, self.config.history_limit) {
            warn!(%error, "Could not record chat turn");
        }

        self.conversation_logger.log(ConversationEvent::new(
            "reply",
            json!({
                "session_id": reply.session_id,
                "text": reply.text_response,
                "had_structured_output": reply.structured_output.is_some(),
                "error": reply.error_message,
            }),
        ));

        self.advance(machine, TurnPhase::Idle);
        reply
    }

    /// Phase bookkeeping; an illegal step is a coordinator bug, logged
    /// rather than allowed to break the turn.
    fn advance(&self, machine: &mut TurnMachine, next: TurnPhase) {
        match machine.advance(next) {
            Ok(phase) => debug!(phase = phase.as_str(), "Turn phase"),
            Err(error) => warn!(%error, "Turn phase bookkeeping failed"),
        }
    }
}

fn saved_summaries(state: &SessionState) -> Vec<RecipeSummary> {
    match state.get(keys::SAVED_RECIPES_LIST) {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(RecipeSummary::from_value)
            .collect(),
        _ => Vec::new(),
    }
}
