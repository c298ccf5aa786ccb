//! Household task specialist
//!
//! Tracks errands and chores in session state under a single list key.
//! Fully deterministic: create, complete, and list are parsed from the
//! query; completion matches a stored task when every remaining word of
//! the request appears in its description.

use async_trait::async_trait;
use majordomo_domain::{
    keys, Handback, HouseholdTask, SessionState, SpecialistId, SpecialistOutcome,
};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::specialists::{Specialist, SpecialistError, SpecialistRequest};

#[derive(Debug, Clone, PartialEq)]
enum TaskAction {
    Create { description: String },
    Complete { needle: String },
    List,
}

const CREATE_MARKERS: &[&str] = &[
    "remind me to ",
    "add a task to ",
    "add a task: ",
    "add task ",
    "new task ",
    "i need to ",
    "we need to ",
];

const COMPLETE_WORDS: &[&str] = &["done", "finished", "complete", "completed", "did"];

const COMPLETE_FILLER: &[&str] = &[
    "mark", "as", "the", "a", "an", "i", "we", "task", "tasks", "my", "that", "is", "are", "it",
    "with", "off", "already", "have",
];

fn parse_task(query: &str) -> Option<TaskAction> {
    let lowered = query.to_lowercase();

    for marker in CREATE_MARKERS {
        if let Some(pos) = lowered.find(marker) {
            let start = pos + marker.len();
            // Offsets come from the lowercased copy; fall back to it when
            // case folding changed byte lengths.
            let rest = query.get(start..).unwrap_or(&lowered[start..]);
            let description = rest.trim().trim_end_matches(['.', '!', '?']).trim();
            if !description.is_empty() {
                return Some(TaskAction::Create {
                    description: description.to_string(),
                });
            }
        }
    }

    let tokens: Vec<String> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if tokens.iter().any(|t| COMPLETE_WORDS.contains(&t.as_str())) {
        let needle: Vec<String> = tokens
            .iter()
            .filter(|t| {
                !COMPLETE_WORDS.contains(&t.as_str()) && !COMPLETE_FILLER.contains(&t.as_str())
            })
            .cloned()
            .collect();
        return Some(TaskAction::Complete {
            needle: needle.join(" "),
        });
    }

    let mentions_tasks = tokens.iter().any(|t| t == "task" || t == "tasks");
    let listing = tokens
        .iter()
        .any(|t| t == "list" || t == "show" || t == "what");
    if mentions_tasks && (listing || tokens.len() <= 3) {
        return Some(TaskAction::List);
    }

    None
}

/// Every word of the needle appears somewhere in the description
fn matches_description(description: &str, needle: &str) -> bool {
    let description = description.to_lowercase();
    needle
        .split_whitespace()
        .all(|word| description.contains(word))
}

/// Keeps the household task list
pub struct TasksSpecialist;

impl TasksSpecialist {
    pub fn new() -> Self {
        Self
    }

    fn load(state: &SessionState) -> Vec<HouseholdTask> {
        match state.get(keys::HOUSEHOLD_TASKS) {
            Some(Value::Array(entries)) => entries
                .iter()
                .filter_map(HouseholdTask::from_value)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn store(state: &mut SessionState, tasks: &[HouseholdTask]) -> Result<(), SpecialistError> {
        let entries = tasks
            .iter()
            .map(HouseholdTask::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        state.set(keys::HOUSEHOLD_TASKS, Value::Array(entries));
        Ok(())
    }
}

impl Default for TasksSpecialist {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Specialist for TasksSpecialist {
    fn id(&self) -> SpecialistId {
        SpecialistId::Tasks
    }

    async fn handle(
        &self,
        request: SpecialistRequest<'_>,
    ) -> Result<SpecialistOutcome, SpecialistError> {
        let Some(action) = parse_task(request.query) else {
            return Ok(SpecialistOutcome::Clarification(
                "I can track household tasks. Try 'remind me to water the plants', \
                 'mark the plants as done', or 'list my tasks'."
                    .to_string(),
            ));
        };
        debug!(?action, "Applying task action");

        let mut tasks = Self::load(request.state);
        let outcome = match action {
            TaskAction::Create { description } => {
                let task = HouseholdTask::new(Uuid::new_v4().to_string(), description);
                let announcement = format!("Task created: \"{}\".", task.description);
                let data = json!({"action": "create", "task": task});
                tasks.push(task);
                Self::store(request.state, &tasks)?;
                SpecialistOutcome::Handback(Handback::new(announcement, data))
            }
            TaskAction::Complete { needle } => {
                if needle.is_empty() {
                    return Ok(SpecialistOutcome::Clarification(
                        "Which task should I mark as done?".to_string(),
                    ));
                }
                let slot = tasks.iter_mut().find(|task| {
                    !task.is_completed() && matches_description(&task.description, &needle)
                });
                match slot {
                    Some(task) => {
                        task.complete();
                        let announcement =
                            format!("Marked \"{}\" as completed.", task.description);
                        let data = json!({"action": "complete", "task": task});
                        Self::store(request.state, &tasks)?;
                        SpecialistOutcome::Handback(Handback::new(announcement, data))
                    }
                    None => SpecialistOutcome::Handback(Handback::new(
                        format!("I couldn't find an open task matching \"{needle}\"."),
                        json!({"action": "complete", "found": false}),
                    )),
                }
            }
            TaskAction::List => {
                if tasks.is_empty() {
                    SpecialistOutcome::Handback(Handback::new(
                        "You have no tasks at the moment.",
                        json!({"action": "list", "tasks": []}),
                    ))
                } else {
                    let lines: Vec<String> = tasks
                        .iter()
                        .map(|task| format!("{} [{}]", task.description, task.status))
                        .collect();
                    SpecialistOutcome::Handback(Handback::new(
                        format!("Here are your tasks:\n- {}", lines.join("\n- ")),
                        json!({"action": "list", "tasks": tasks}),
                    ))
                }
            }
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use majordomo_domain::UserProfile;

    fn seeded_state() -> SessionState {
        let mut state = SessionState::new();
        state.initialize(&UserProfile::starter()).unwrap();
        state
    }

    async fn run(query: &str, state: &mut SessionState) -> SpecialistOutcome {
        TasksSpecialist::new()
            .handle(SpecialistRequest {
                query,
                session_id: "s1",
                state,
            })
            .await
            .unwrap()
    }

    #[test]
    fn test_parse_create_keeps_full_description() {
        assert_eq!(
            parse_task("Remind me to water the plants tonight."),
            Some(TaskAction::Create {
                description: "water the plants tonight".to_string()
            })
        );
    }

    #[test]
    fn test_parse_complete_strips_filler() {
        assert_eq!(
            parse_task("mark the plants as done"),
            Some(TaskAction::Complete {
                needle: "plants".to_string()
            })
        );
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_task("what are my tasks?"), Some(TaskAction::List));
        assert_eq!(parse_task("list tasks"), Some(TaskAction::List));
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let mut state = seeded_state();
        let outcome = run("remind me to water the plants", &mut state).await;
        let SpecialistOutcome::Handback(handback) = outcome else {
            panic!("expected a handback");
        };
        assert_eq!(handback.announcement, "Task created: \"water the plants\".");

        let SpecialistOutcome::Handback(listing) = run("list my tasks", &mut state).await else {
            panic!("expected a handback");
        };
        assert!(listing.announcement.contains("water the plants [pending]"));
    }

    #[tokio::test]
    async fn test_complete_matches_on_words() {
        let mut state = seeded_state();
        run("remind me to water the plants", &mut state).await;
        run("remind me to book the dentist", &mut state).await;

        let SpecialistOutcome::Handback(handback) =
            run("mark the plants as done", &mut state).await
        else {
            panic!("expected a handback");
        };
        assert_eq!(
            handback.announcement,
            "Marked \"water the plants\" as completed."
        );

        let tasks = TasksSpecialist::load(&state);
        assert!(tasks[0].is_completed());
        assert!(!tasks[1].is_completed());
    }

    #[tokio::test]
    async fn test_complete_unknown_task() {
        let mut state = seeded_state();
        run("remind me to water the plants", &mut state).await;

        let SpecialistOutcome::Handback(handback) =
            run("mark the laundry as done", &mut state).await
        else {
            panic!("expected a handback");
        };
        assert_eq!(
            handback.announcement,
            "I couldn't find an open task matching \"laundry\"."
        );
    }

    #[tokio::test]
    async fn test_unparseable_request_asks() {
        let mut state = seeded_state();
        let SpecialistOutcome::Clarification(question) =
            run("household things", &mut state).await
        else {
            panic!("expected a clarifying question");
        };
        assert!(question.contains("remind me to"));
    }
}
