use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuotesInfoError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Invalid reference: {message}")]
    InvalidReference { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl QuotesInfoError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn invalid_reference(message: impl Into<String>) -> Self {
        Self::InvalidReference {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for QuotesInfoError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            UserNotFound { id } => Self::not_found("User", id),
            UserEmailNotFound { email } => Self::not_found("User", email),
            QuoteNotFound { id } => Self::not_found("Quote", id),
            e @ (EmailAlreadyExists { .. } | UserHasQuotes { .. }) => Self::conflict(e.to_string()),
            e @ AuthorNotFound { .. } => Self::invalid_reference(e.to_string()),
            e @ (InvalidEmail { .. }
            | EmptyField { .. }
            | FieldTooLong { .. }
            | Validation { .. }) => Self::validation(e.to_string()),
            Database { .. } => Self::internal(),
        }
    }
}
