use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::contract::model::{
    NewQuote, NewUser, PageRequest, Quote, QuoteFilter, QuotePatch, User, UserFilter, UserPatch,
};

/// REST DTO for user representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// REST DTO for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateUserReq {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "value is not a valid email address"))]
    pub email: String,
}

/// REST DTO for updating a user (partial)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, Default)]
pub struct UpdateUserReq {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "value is not a valid email address"))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Page number, starting at 1
    pub page: Option<u32>,
    /// Items per page (1..=100)
    pub per_page: Option<u32>,
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    /// Case-insensitive substring of the email
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuoteDto {
    pub id: i32,
    pub text: String,
    pub category: Option<String>,
    /// Id of the user the quote is attributed to
    pub author: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateQuoteReq {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: String,
    #[serde(default)]
    pub category: Option<String>,
    pub author: i32,
}

/// Partial quote update. An empty `category` clears it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, Default)]
pub struct UpdateQuoteReq {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: Option<String>,
    pub category: Option<String>,
    pub author: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuotesQuery {
    /// Page number, starting at 1
    pub page: Option<u32>,
    /// Items per page (1..=100)
    pub per_page: Option<u32>,
    /// Exact category
    pub category: Option<String>,
    /// Exact author id
    pub author: Option<i32>,
}

// Conversion implementations between REST DTOs and contract models

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
        }
    }
}

impl From<UpdateUserReq> for UserPatch {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
        }
    }
}

impl ListUsersQuery {
    pub fn into_parts(self) -> (UserFilter, PageRequest) {
        (
            UserFilter {
                name: self.name,
                email: self.email,
            },
            PageRequest {
                page: self.page,
                per_page: self.per_page,
            },
        )
    }
}

impl From<Quote> for QuoteDto {
    fn from(quote: Quote) -> Self {
        Self {
            id: quote.id,
            text: quote.text,
            category: quote.category,
            author: quote.author,
            created_at: quote.created_at,
            updated_at: quote.updated_at,
        }
    }
}

impl From<CreateQuoteReq> for NewQuote {
    fn from(req: CreateQuoteReq) -> Self {
        Self {
            text: req.text,
            category: req.category,
            author: req.author,
        }
    }
}

impl From<UpdateQuoteReq> for QuotePatch {
    fn from(req: UpdateQuoteReq) -> Self {
        Self {
            text: req.text,
            // Blank values are turned into "clear" by the service
            category: req.category.map(Some),
            author: req.author,
        }
    }
}

impl ListQuotesQuery {
    pub fn into_parts(self) -> (QuoteFilter, PageRequest) {
        (
            QuoteFilter {
                category: self.category,
                author: self.author,
            },
            PageRequest {
                page: self.page,
                per_page: self.per_page,
            },
        )
    }
}
