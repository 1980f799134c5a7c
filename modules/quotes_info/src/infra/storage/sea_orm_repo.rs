//! SeaORM-backed repository implementations for the domain ports.
//!
//! Both adapters are generic over `C: ConnectionTrait + TransactionTrait`, so
//! they can be built over a `DatabaseConnection` or a surrounding transaction.
//! Every check-and-write runs inside one transaction opened on `conn`, and the
//! first statement of that transaction is always a write. SQLite then takes the
//! write lock up front (waiting on `busy_timeout`) instead of failing to upgrade
//! a read snapshot. Unique and foreign-key violations reported by the store are
//! the source of truth for conflicts.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{BinOper, Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use tracing::debug;

use crate::contract::model::{
    NewQuote, NewUser, Quote, QuoteFilter, QuotePatch, User, UserFilter, UserPatch,
};
use crate::domain::error::DomainError;
use crate::domain::repo::{QuotesRepository, UsersRepository};
use crate::infra::storage::entity::{quote, user};

/// Wrap a storage failure with the operation that produced it.
fn db_err(op: &'static str) -> impl FnOnce(DbErr) -> DomainError {
    move |e| DomainError::database(format!("{op} failed: {e}"))
}

/// `LOWER(column) LIKE LOWER('%needle%') ESCAPE '\'`.
///
/// Both sides are folded by the database so column and needle always agree
/// (SQLite folds ASCII only, PostgreSQL folds Unicode).
fn contains_ci(column: user::Column, needle: &str) -> SimpleExpr {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let pattern = SimpleExpr::Binary(
        Box::new(Func::lower(Expr::val(format!("%{escaped}%"))).into()),
        BinOper::Escape,
        Box::new(SimpleExpr::Constant('\\'.into())),
    );
    Expr::expr(Func::lower(Expr::col((user::Entity, column)))).binary(BinOper::Like, pattern)
}

/// No-op `UPDATE users SET updated_at = updated_at WHERE id = ?`.
/// Takes the write lock on behalf of `txn`; false when the row is missing.
async fn claim_user<C: ConnectionTrait>(txn: &C, id: i32) -> Result<bool, DomainError> {
    let res = user::Entity::update_many()
        .col_expr(user::Column::UpdatedAt, Expr::col(user::Column::UpdatedAt).into())
        .filter(user::Column::Id.eq(id))
        .exec(txn)
        .await
        .map_err(db_err("lock user row"))?;
    Ok(res.rows_affected > 0)
}

async fn claim_quote<C: ConnectionTrait>(txn: &C, id: i32) -> Result<bool, DomainError> {
    let res = quote::Entity::update_many()
        .col_expr(quote::Column::UpdatedAt, Expr::col(quote::Column::UpdatedAt).into())
        .filter(quote::Column::Id.eq(id))
        .exec(txn)
        .await
        .map_err(db_err("lock quote row"))?;
    Ok(res.rows_affected > 0)
}

async fn ensure_author_exists<C: ConnectionTrait>(conn: &C, author: i32) -> Result<(), DomainError> {
    let found = user::Entity::find_by_id(author)
        .one(conn)
        .await
        .map_err(db_err("author lookup"))?;
    match found {
        Some(_) => Ok(()),
        None => Err(DomainError::author_not_found(author)),
    }
}

/// SeaORM users repository.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        let found = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(db_err("find user by id"))?;
        Ok(found.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .map_err(db_err("find user by email"))?;
        Ok(found.map(Into::into))
    }

    async fn list(
        &self,
        filter: &UserFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<User>, u64), DomainError> {
        let mut query = user::Entity::find();
        if let Some(name) = filter.name.as_deref() {
            query = query.filter(contains_ci(user::Column::Name, name));
        }
        if let Some(email) = filter.email.as_deref() {
            query = query.filter(contains_ci(user::Column::Email, email));
        }

        let total = query
            .clone()
            .count(&self.conn)
            .await
            .map_err(db_err("count users"))?;
        let rows = query
            .order_by_asc(user::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await
            .map_err(db_err("list users"))?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn insert(&self, new_user: NewUser, now: DateTime<Utc>) -> Result<User, DomainError> {
        let txn = self.conn.begin().await.map_err(db_err("begin transaction"))?;

        let email = new_user.email.clone();
        let model = user::ActiveModel {
            id: NotSet,
            name: Set(new_user.name),
            email: Set(new_user.email),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::email_already_exists(email),
            _ => db_err("insert user")(e),
        })?;

        txn.commit().await.map_err(db_err("commit"))?;
        debug!(user_id = model.id, "user row inserted");
        Ok(model.into())
    }

    async fn update(
        &self,
        id: i32,
        patch: UserPatch,
        now: DateTime<Utc>,
    ) -> Result<User, DomainError> {
        let txn = self.conn.begin().await.map_err(db_err("begin transaction"))?;
        if !claim_user(&txn, id).await? {
            return Err(DomainError::user_not_found(id));
        }

        let current = user::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err("find user by id"))?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        let conflict_email = patch.email.clone().unwrap_or_default();
        let mut active = current.into_active_model();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(email) = patch.email {
            active.email = Set(email);
        }
        active.updated_at = Set(now);

        let model = active.update(&txn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                DomainError::email_already_exists(conflict_email)
            }
            _ => db_err("update user")(e),
        })?;

        txn.commit().await.map_err(db_err("commit"))?;
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<User, DomainError> {
        let txn = self.conn.begin().await.map_err(db_err("begin transaction"))?;
        if !claim_user(&txn, id).await? {
            return Err(DomainError::user_not_found(id));
        }

        let current = user::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err("find user by id"))?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        let quotes = quote::Entity::find()
            .filter(quote::Column::Author.eq(id))
            .count(&txn)
            .await
            .map_err(db_err("count user quotes"))?;
        if quotes > 0 {
            return Err(DomainError::user_has_quotes(id, quotes));
        }

        user::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err("delete user"))?;

        txn.commit().await.map_err(db_err("commit"))?;
        Ok(current.into())
    }
}

/// SeaORM quotes repository.
pub struct SeaOrmQuotesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmQuotesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> QuotesRepository for SeaOrmQuotesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i32) -> Result<Option<Quote>, DomainError> {
        let found = quote::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(db_err("find quote by id"))?;
        Ok(found.map(Into::into))
    }

    async fn list(
        &self,
        filter: &QuoteFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Quote>, u64), DomainError> {
        let mut query = quote::Entity::find();
        if let Some(category) = filter.category.as_deref() {
            query = query.filter(quote::Column::Category.eq(category));
        }
        if let Some(author) = filter.author {
            query = query.filter(quote::Column::Author.eq(author));
        }

        let total = query
            .clone()
            .count(&self.conn)
            .await
            .map_err(db_err("count quotes"))?;
        let rows = query
            .order_by_desc(quote::Column::CreatedAt)
            .order_by_desc(quote::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await
            .map_err(db_err("list quotes"))?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn insert(&self, new_quote: NewQuote, now: DateTime<Utc>) -> Result<Quote, DomainError> {
        let txn = self.conn.begin().await.map_err(db_err("begin transaction"))?;

        let author = new_quote.author;
        let model = quote::ActiveModel {
            id: NotSet,
            text: Set(new_quote.text),
            category: Set(new_quote.category),
            author: Set(author),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => DomainError::author_not_found(author),
            _ => db_err("insert quote")(e),
        })?;

        txn.commit().await.map_err(db_err("commit"))?;
        debug!(quote_id = model.id, "quote row inserted");
        Ok(model.into())
    }

    async fn update(
        &self,
        id: i32,
        patch: QuotePatch,
        now: DateTime<Utc>,
    ) -> Result<Quote, DomainError> {
        let txn = self.conn.begin().await.map_err(db_err("begin transaction"))?;
        if !claim_quote(&txn, id).await? {
            return Err(DomainError::quote_not_found(id));
        }

        let current = quote::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err("find quote by id"))?
            .ok_or_else(|| DomainError::quote_not_found(id))?;

        if let Some(author) = patch.author {
            ensure_author_exists(&txn, author).await?;
        }

        let mut active = current.into_active_model();
        if let Some(text) = patch.text {
            active.text = Set(text);
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(author) = patch.author {
            active.author = Set(author);
        }
        active.updated_at = Set(now);

        let model = active.update(&txn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                DomainError::author_not_found(patch.author.unwrap_or_default())
            }
            _ => db_err("update quote")(e),
        })?;

        txn.commit().await.map_err(db_err("commit"))?;
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<Quote, DomainError> {
        let txn = self.conn.begin().await.map_err(db_err("begin transaction"))?;
        if !claim_quote(&txn, id).await? {
            return Err(DomainError::quote_not_found(id));
        }

        let current = quote::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err("find quote by id"))?
            .ok_or_else(|| DomainError::quote_not_found(id))?;

        quote::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err("delete quote"))?;

        txn.commit().await.map_err(db_err("commit"))?;
        Ok(current.into())
    }
}
