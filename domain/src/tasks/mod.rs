//! Household task entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::DomainError;

/// Lifecycle of a household task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An errand or chore tracked in the conversation (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdTask {
    pub id: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

impl HouseholdTask {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            status: TaskStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn start(&mut self) {
        self.status = TaskStatus::InProgress;
    }

    pub fn complete(&mut self) {
        self.status = TaskStatus::Completed;
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn to_value(&self) -> Result<Value, DomainError> {
        serde_json::to_value(self).map_err(|e| DomainError::serialization("task", e.to_string()))
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_is_pending() {
        let task = HouseholdTask::new("t-1", "water the plants");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(!task.is_completed());
    }

    #[test]
    fn test_status_transitions() {
        let mut task = HouseholdTask::new("t-1", "water the plants");
        task.start();
        assert_eq!(task.status, TaskStatus::InProgress);
        task.complete();
        assert!(task.is_completed());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let mut task = HouseholdTask::new("t-1", "water the plants");
        task.start();
        let value = task.to_value().unwrap();
        assert_eq!(value["status"], serde_json::json!("in_progress"));
        assert_eq!(HouseholdTask::from_value(&value).unwrap(), task);
    }
}
