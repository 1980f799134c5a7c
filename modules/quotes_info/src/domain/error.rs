use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("User not found: {id}")]
    UserNotFound { id: i32 },

    #[error("User not found: {email}")]
    UserEmailNotFound { email: String },

    #[error("Quote not found: {id}")]
    QuoteNotFound { id: i32 },

    #[error("User with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("User {id} still has {count} quotes")]
    UserHasQuotes { id: i32, count: u64 },

    #[error("Author with id {id} does not exist")]
    AuthorNotFound { id: i32 },

    #[error("Invalid email format: '{email}'")]
    InvalidEmail { email: String },

    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("{field} too long: {len} characters (max: {max})")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn user_not_found(id: i32) -> Self {
        Self::UserNotFound { id }
    }

    pub fn user_email_not_found(email: impl Into<String>) -> Self {
        Self::UserEmailNotFound {
            email: email.into(),
        }
    }

    pub fn quote_not_found(id: i32) -> Self {
        Self::QuoteNotFound { id }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn user_has_quotes(id: i32, count: u64) -> Self {
        Self::UserHasQuotes { id, count }
    }

    pub fn author_not_found(id: i32) -> Self {
        Self::AuthorNotFound { id }
    }

    pub fn invalid_email(email: impl Into<String>) -> Self {
        Self::InvalidEmail {
            email: email.into(),
        }
    }

    pub fn empty_field(field: &'static str) -> Self {
        Self::EmptyField { field }
    }

    pub fn field_too_long(field: &'static str, len: usize, max: usize) -> Self {
        Self::FieldTooLong { field, len, max }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
