use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::{non_blank, now, required_text, ServiceConfig};
use crate::contract::model::{NewQuote, Page, PageRequest, Quote, QuoteFilter, QuotePatch};
use crate::domain::error::DomainError;
use crate::domain::repo::QuotesRepository;

/// Domain service for quotes. Author existence is enforced by the repository
/// inside the writing transaction.
#[derive(Clone)]
pub struct QuoteService {
    repo: Arc<dyn QuotesRepository>,
    config: ServiceConfig,
}

impl QuoteService {
    pub fn new(repo: Arc<dyn QuotesRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    #[instrument(name = "quotes_info.service.get_quote", skip(self), fields(quote_id = id))]
    pub async fn get_quote(&self, id: i32) -> Result<Quote, DomainError> {
        debug!("Getting quote by id");

        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::quote_not_found(id))
    }

    #[instrument(name = "quotes_info.service.list_quotes", skip(self))]
    pub async fn list_quotes(
        &self,
        filter: QuoteFilter,
        page: PageRequest,
    ) -> Result<Page<Quote>, DomainError> {
        debug!("Listing quotes");

        let resolved = self.config.resolve_page(page)?;
        let filter = QuoteFilter {
            category: non_blank(filter.category),
            author: filter.author,
        };

        let (items, total) = self
            .repo
            .list(&filter, resolved.offset(), resolved.limit())
            .await?;

        debug!("Successfully listed {} of {} quotes", items.len(), total);
        Ok(Page {
            items,
            total,
            page: resolved.page,
            per_page: resolved.per_page,
        })
    }

    #[instrument(
        name = "quotes_info.service.create_quote",
        skip(self, new_quote),
        fields(author = new_quote.author)
    )]
    pub async fn create_quote(&self, new_quote: NewQuote) -> Result<Quote, DomainError> {
        info!("Creating new quote");

        let new_quote = NewQuote {
            text: required_text("text", &new_quote.text)?,
            category: non_blank(new_quote.category),
            author: new_quote.author,
        };

        let quote = self.repo.insert(new_quote, now()).await?;

        info!("Successfully created quote with id={}", quote.id);
        Ok(quote)
    }

    #[instrument(
        name = "quotes_info.service.update_quote",
        skip(self, patch),
        fields(quote_id = id)
    )]
    pub async fn update_quote(&self, id: i32, patch: QuotePatch) -> Result<Quote, DomainError> {
        info!("Updating quote");

        let patch = QuotePatch {
            text: patch
                .text
                .map(|t| required_text("text", &t))
                .transpose()?,
            category: patch.category.map(non_blank),
            author: patch.author,
        };

        let quote = self.repo.update(id, patch, now()).await?;

        info!("Successfully updated quote");
        Ok(quote)
    }

    #[instrument(name = "quotes_info.service.delete_quote", skip(self), fields(quote_id = id))]
    pub async fn delete_quote(&self, id: i32) -> Result<Quote, DomainError> {
        info!("Deleting quote");

        let quote = self.repo.delete(id).await?;

        info!("Successfully deleted quote");
        Ok(quote)
    }
}
