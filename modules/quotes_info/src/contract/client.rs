use async_trait::async_trait;

use crate::contract::{
    error::QuotesInfoError,
    model::{
        NewQuote, NewUser, Page, PageRequest, Quote, QuoteFilter, QuotePatch, User, UserFilter,
        UserPatch,
    },
};

/// Public API trait for the quotes_info module that other modules can use
#[async_trait]
pub trait QuotesInfoApi: Send + Sync {
    /// Get a user by ID
    async fn get_user(&self, id: i32) -> Result<User, QuotesInfoError>;

    /// Get a user by exact email
    async fn get_user_by_email(&self, email: &str) -> Result<User, QuotesInfoError>;

    /// List users matching the filter, ordered by id
    async fn list_users(
        &self,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<Page<User>, QuotesInfoError>;

    /// Create a new user
    async fn create_user(&self, new_user: NewUser) -> Result<User, QuotesInfoError>;

    /// Update a user with partial data
    async fn update_user(&self, id: i32, patch: UserPatch) -> Result<User, QuotesInfoError>;

    /// Delete a user by ID, returning the removed record
    async fn delete_user(&self, id: i32) -> Result<User, QuotesInfoError>;

    async fn get_quote(&self, id: i32) -> Result<Quote, QuotesInfoError>;

    /// List quotes matching the filter, newest first
    async fn list_quotes(
        &self,
        filter: QuoteFilter,
        page: PageRequest,
    ) -> Result<Page<Quote>, QuotesInfoError>;

    async fn create_quote(&self, new_quote: NewQuote) -> Result<Quote, QuotesInfoError>;

    async fn update_quote(&self, id: i32, patch: QuotePatch) -> Result<Quote, QuotesInfoError>;

    async fn delete_quote(&self, id: i32) -> Result<Quote, QuotesInfoError>;
}
