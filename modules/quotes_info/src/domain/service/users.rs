use std::sync::Arc;

use tracing::{debug, info, instrument};
use validator::ValidateEmail;

use super::{non_blank, now, required_text, ServiceConfig};
use crate::contract::model::{NewUser, Page, PageRequest, User, UserFilter, UserPatch};
use crate::domain::error::DomainError;
use crate::domain::repo::UsersRepository;

/// Domain service with business rules for user management.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UsersRepository>,
    config: ServiceConfig,
}

impl UserService {
    pub fn new(repo: Arc<dyn UsersRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    #[instrument(name = "quotes_info.service.get_user", skip(self), fields(user_id = id))]
    pub async fn get_user(&self, id: i32) -> Result<User, DomainError> {
        debug!("Getting user by id");

        let user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;
        debug!("Successfully retrieved user");
        Ok(user)
    }

    #[instrument(name = "quotes_info.service.get_user_by_email", skip(self))]
    pub async fn get_user_by_email(&self, email: &str) -> Result<User, DomainError> {
        debug!("Getting user by email");

        let email = email.trim();
        self.repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::user_email_not_found(email))
    }

    #[instrument(name = "quotes_info.service.list_users", skip(self))]
    pub async fn list_users(
        &self,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<Page<User>, DomainError> {
        debug!("Listing users");

        let resolved = self.config.resolve_page(page)?;
        let filter = UserFilter {
            name: non_blank(filter.name),
            email: non_blank(filter.email),
        };

        let (items, total) = self
            .repo
            .list(&filter, resolved.offset(), resolved.limit())
            .await?;

        debug!("Successfully listed {} of {} users", items.len(), total);
        Ok(Page {
            items,
            total,
            page: resolved.page,
            per_page: resolved.per_page,
        })
    }

    #[instrument(
        name = "quotes_info.service.create_user",
        skip(self, new_user),
        fields(email = %new_user.email)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");

        let new_user = NewUser {
            name: self.validate_name(&new_user.name)?,
            email: validate_email(&new_user.email)?,
        };

        let user = self.repo.insert(new_user, now()).await?;

        info!("Successfully created user with id={}", user.id);
        Ok(user)
    }

    #[instrument(
        name = "quotes_info.service.update_user",
        skip(self, patch),
        fields(user_id = id)
    )]
    pub async fn update_user(&self, id: i32, patch: UserPatch) -> Result<User, DomainError> {
        info!("Updating user");

        let patch = UserPatch {
            name: patch.name.map(|n| self.validate_name(&n)).transpose()?,
            email: patch.email.map(|e| validate_email(&e)).transpose()?,
        };

        let user = self.repo.update(id, patch, now()).await?;

        info!("Successfully updated user");
        Ok(user)
    }

    #[instrument(name = "quotes_info.service.delete_user", skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, id: i32) -> Result<User, DomainError> {
        info!("Deleting user");

        let user = self.repo.delete(id).await?;

        info!("Successfully deleted user");
        Ok(user)
    }

    // --- validation helpers ---

    fn validate_name(&self, name: &str) -> Result<String, DomainError> {
        let name = required_text("name", name)?;
        let len = name.chars().count();
        if len > self.config.max_name_length {
            return Err(DomainError::field_too_long(
                "name",
                len,
                self.config.max_name_length,
            ));
        }
        Ok(name)
    }
}

fn validate_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(DomainError::empty_field("email"));
    }
    if !email.validate_email() {
        return Err(DomainError::invalid_email(email));
    }
    Ok(email.to_string())
}
