use crate::sections::Section;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with key {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Both identity document numbers are required to derive a draft id")]
    MissingIdentifier,

    #[error("Onboarding is incomplete: the {missing_section} section has not been saved")]
    IncompleteOnboarding { missing_section: Section },

    #[error("Onboarding for draft {draft_id} has already been submitted")]
    AlreadySubmitted { draft_id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::Validation`] naming the offending field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`CoreError::NotFound`] keyed by any displayable value.
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}
