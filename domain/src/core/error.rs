//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// The four variants map to the four failure families the coordinator
/// distinguishes: caller mistakes, normal misses, payload shape problems,
/// and collaborator faults. Only `Validation` is ever surfaced to the
/// caller as an error; the rest become conversational replies.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Serialization failed for {context}: {message}")]
    Serialization { context: String, message: String },

    #[error("Collaborator {name} failed: {message}")]
    Collaborator { name: String, message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn serialization(context: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Serialization {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn collaborator(name: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Collaborator {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Check if this error is a normal not-found outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound { .. })
    }

    /// Check if this error should be answered with the details apology
    pub fn is_serialization(&self) -> bool {
        matches!(self, DomainError::Serialization { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let error = DomainError::validation("query", "must not be empty");
        assert_eq!(error.to_string(), "Invalid query: must not be empty");
    }

    #[test]
    fn test_not_found_error_display() {
        let error = DomainError::not_found("recipe", "r-123");
        assert_eq!(error.to_string(), "recipe not found: r-123");
    }

    #[test]
    fn test_is_not_found_check() {
        assert!(DomainError::not_found("recipe", "r-1").is_not_found());
        assert!(!DomainError::validation("query", "empty").is_not_found());
        assert!(!DomainError::collaborator("record store", "down").is_not_found());
    }

    #[test]
    fn test_is_serialization_check() {
        assert!(DomainError::serialization("recipe payload", "bad shape").is_serialization());
        assert!(!DomainError::not_found("recipe", "r-1").is_serialization());
    }
}
