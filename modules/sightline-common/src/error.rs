use serde::Serialize;
use thiserror::Error;

use crate::rbac::Permission;

/// One field that failed query or body validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum SightlineError {
    /// Every offending field, not just the first. Validation never partially
    /// applies input.
    #[error("invalid parameters ({} field{})", .0.len(), if .0.len() == 1 { "" } else { "s" })]
    Validation(Vec<FieldError>),

    #[error("authentication required")]
    Unauthenticated,

    #[error("missing permission {0}")]
    Forbidden(Permission),

    #[error("{0} not found")]
    NotFound(String),

    #[error("users cannot change their own role")]
    SelfRoleChange,

    #[error("repository error: {0}")]
    Repository(String),
}

impl SightlineError {
    pub fn validation(fields: Vec<FieldError>) -> Self {
        SightlineError::Validation(fields)
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        SightlineError::NotFound(what.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_counts_fields() {
        let err = SightlineError::validation(vec![
            FieldError::new("minScore", "must be a number between 0 and 100"),
            FieldError::new("days", "must be 7 or 30"),
        ]);
        assert_eq!(err.to_string(), "invalid parameters (2 fields)");

        let one = SightlineError::validation(vec![FieldError::new("page", "must be at least 1")]);
        assert_eq!(one.to_string(), "invalid parameters (1 field)");
    }

    #[test]
    fn forbidden_names_the_missing_permission() {
        let err = SightlineError::Forbidden(Permission::EventsDelete);
        assert_eq!(err.to_string(), "missing permission events:delete");
    }
}
