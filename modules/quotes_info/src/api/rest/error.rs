use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use validator::ValidationErrors;

use crate::api::rest::envelope::ErrorEnvelope;
use crate::domain::error::DomainError;

/// REST-level failure rendered as an error envelope.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorEnvelope::new(self.message))).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::bad_request(format!("Validation error: {errors}"))
    }
}

/// Map domain error to an HTTP status and client-facing message
pub fn map_domain_error(e: &DomainError) -> ApiError {
    match e {
        DomainError::UserNotFound { .. } | DomainError::UserEmailNotFound { .. } => {
            ApiError::new(StatusCode::NOT_FOUND, "User not found")
        }
        DomainError::QuoteNotFound { .. } => {
            ApiError::new(StatusCode::NOT_FOUND, "Quote not found")
        }
        DomainError::EmailAlreadyExists { .. } => {
            ApiError::bad_request("User with this email already exists")
        }
        DomainError::UserHasQuotes { .. }
        | DomainError::AuthorNotFound { .. }
        | DomainError::InvalidEmail { .. }
        | DomainError::EmptyField { .. }
        | DomainError::FieldTooLong { .. }
        | DomainError::Validation { .. } => ApiError::bad_request(e.to_string()),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal database error occurred",
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404_with_entity_message() {
        let err = map_domain_error(&DomainError::user_not_found(7));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "User not found");

        let err = map_domain_error(&DomainError::quote_not_found(7));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Quote not found");
    }

    #[test]
    fn conflicts_and_references_map_to_400() {
        let err = map_domain_error(&DomainError::email_already_exists("a@b.io"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "User with this email already exists");

        let err = map_domain_error(&DomainError::author_not_found(42));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Author with id 42 does not exist");

        let err = map_domain_error(&DomainError::user_has_quotes(3, 2));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "User 3 still has 2 quotes");
    }

    #[test]
    fn database_errors_are_hidden() {
        let err = map_domain_error(&DomainError::database("disk I/O error at /var/db"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message().contains("/var/db"));
    }
}
