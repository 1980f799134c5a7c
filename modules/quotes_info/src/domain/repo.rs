use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{
    NewQuote, NewUser, Quote, QuoteFilter, QuotePatch, User, UserFilter, UserPatch,
};
use crate::domain::error::DomainError;

/// Port for the domain layer: user persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
///
/// Writes that depend on a check (email uniqueness, remaining quotes) perform
/// the check and the write atomically.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Load a user by id.
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError>;
    /// Load a user by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    /// Filtered slice ordered by id, plus the filtered total.
    async fn list(
        &self,
        filter: &UserFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<User>, u64), DomainError>;
    /// Insert a validated user. Fails with `EmailAlreadyExists` on a taken email.
    async fn insert(&self, new_user: NewUser, now: DateTime<Utc>) -> Result<User, DomainError>;
    /// Apply a validated patch. Fails with `UserNotFound` or `EmailAlreadyExists`.
    async fn update(
        &self,
        id: i32,
        patch: UserPatch,
        now: DateTime<Utc>,
    ) -> Result<User, DomainError>;
    /// Delete by id, returning the removed row. Fails with `UserHasQuotes`
    /// while quotes reference the user.
    async fn delete(&self, id: i32) -> Result<User, DomainError>;
}

/// Port for quote persistence.
#[async_trait]
pub trait QuotesRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Quote>, DomainError>;
    /// Filtered slice ordered newest first, plus the filtered total.
    async fn list(
        &self,
        filter: &QuoteFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Quote>, u64), DomainError>;
    /// Insert a validated quote. Fails with `AuthorNotFound` on a dangling author.
    async fn insert(&self, new_quote: NewQuote, now: DateTime<Utc>) -> Result<Quote, DomainError>;
    async fn update(
        &self,
        id: i32,
        patch: QuotePatch,
        now: DateTime<Utc>,
    ) -> Result<Quote, DomainError>;
    async fn delete(&self, id: i32) -> Result<Quote, DomainError>;
}
