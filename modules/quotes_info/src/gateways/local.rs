use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::QuotesInfoApi,
    error::QuotesInfoError,
    model::{
        NewQuote, NewUser, Page, PageRequest, Quote, QuoteFilter, QuotePatch, User, UserFilter,
        UserPatch,
    },
};
use crate::domain::service::{QuoteService, UserService};

/// Local implementation of the QuotesInfoApi trait that delegates to the domain services
pub struct QuotesInfoLocalClient {
    users: Arc<UserService>,
    quotes: Arc<QuoteService>,
}

impl QuotesInfoLocalClient {
    pub fn new(users: Arc<UserService>, quotes: Arc<QuoteService>) -> Self {
        Self { users, quotes }
    }
}

#[async_trait]
impl QuotesInfoApi for QuotesInfoLocalClient {
    async fn get_user(&self, id: i32) -> Result<User, QuotesInfoError> {
        self.users.get_user(id).await.map_err(Into::into)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, QuotesInfoError> {
        self.users
            .get_user_by_email(email)
            .await
            .map_err(Into::into)
    }

    async fn list_users(
        &self,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<Page<User>, QuotesInfoError> {
        self.users
            .list_users(filter, page)
            .await
            .map_err(Into::into)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, QuotesInfoError> {
        self.users.create_user(new_user).await.map_err(Into::into)
    }

    async fn update_user(&self, id: i32, patch: UserPatch) -> Result<User, QuotesInfoError> {
        self.users
            .update_user(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_user(&self, id: i32) -> Result<User, QuotesInfoError> {
        self.users.delete_user(id).await.map_err(Into::into)
    }

    async fn get_quote(&self, id: i32) -> Result<Quote, QuotesInfoError> {
        self.quotes.get_quote(id).await.map_err(Into::into)
    }

    async fn list_quotes(
        &self,
        filter: QuoteFilter,
        page: PageRequest,
    ) -> Result<Page<Quote>, QuotesInfoError> {
        self.quotes
            .list_quotes(filter, page)
            .await
            .map_err(Into::into)
    }

    async fn create_quote(&self, new_quote: NewQuote) -> Result<Quote, QuotesInfoError> {
        self.quotes
            .create_quote(new_quote)
            .await
            .map_err(Into::into)
    }

    async fn update_quote(&self, id: i32, patch: QuotePatch) -> Result<Quote, QuotesInfoError> {
        self.quotes
            .update_quote(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_quote(&self, id: i32) -> Result<Quote, QuotesInfoError> {
        self.quotes.delete_quote(id).await.map_err(Into::into)
    }
}
