use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use tracing::{error, info};

use crate::api::rest::dto::{
    CreateQuoteReq, CreateUserReq, ListQuotesQuery, ListUsersQuery, QuoteDto, UpdateQuoteReq,
    UpdateUserReq, UserDto,
};
use crate::api::rest::envelope::{Envelope, ErrorEnvelope, ListEnvelope};
use crate::api::rest::error::{map_domain_error, ApiError};
use crate::api::rest::extract::{JsonBody, PathParam, QueryParams};
use crate::domain::service::{QuoteService, UserService};

type ApiResult<T> = Result<Json<T>, ApiError>;

// ----------------------------- users -----------------------------

/// Create a new user
#[utoipa::path(
    post,
    path = "/users/",
    tag = "users",
    operation_id = "quotes_info.create_user",
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "User created", body = Envelope<UserDto>),
        (status = 400, description = "Invalid input or email already registered", body = ErrorEnvelope),
        (status = 500, description = "Internal error", body = ErrorEnvelope),
    )
)]
pub async fn create_user(
    Extension(svc): Extension<Arc<UserService>>,
    JsonBody(req_body): JsonBody<CreateUserReq>,
) -> Result<(StatusCode, Json<Envelope<UserDto>>), ApiError> {
    info!("Creating user: {:?}", req_body);

    match svc.create_user(req_body.into()).await {
        Ok(user) => Ok((
            StatusCode::CREATED,
            Json(Envelope::ok("User created successfully", UserDto::from(user))),
        )),
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(map_domain_error(&e))
        }
    }
}

/// List users with pagination and filtering
#[utoipa::path(
    get,
    path = "/users/",
    tag = "users",
    operation_id = "quotes_info.list_users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of users", body = ListEnvelope<UserDto>),
        (status = 400, description = "Invalid pagination parameters", body = ErrorEnvelope),
        (status = 500, description = "Internal error", body = ErrorEnvelope),
    )
)]
pub async fn list_users(
    Extension(svc): Extension<Arc<UserService>>,
    QueryParams(query): QueryParams<ListUsersQuery>,
) -> ApiResult<ListEnvelope<UserDto>> {
    info!("Listing users with query: {:?}", query);

    let (filter, page) = query.into_parts();
    match svc.list_users(filter, page).await {
        Ok(page) => {
            let message = format!("Retrieved {} users", page.items.len());
            Ok(Json(ListEnvelope::from_page(message, page.map(UserDto::from))))
        }
        Err(e) => {
            error!("Failed to list users: {}", e);
            Err(map_domain_error(&e))
        }
    }
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    operation_id = "quotes_info.get_user",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = Envelope<UserDto>),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope),
    )
)]
pub async fn get_user(
    Extension(svc): Extension<Arc<UserService>>,
    PathParam(id): PathParam<i32>,
) -> ApiResult<Envelope<UserDto>> {
    info!("Getting user with id: {}", id);

    match svc.get_user(id).await {
        Ok(user) => Ok(Json(Envelope::ok(
            "User retrieved successfully",
            UserDto::from(user),
        ))),
        Err(e) => {
            error!("Failed to get user {}: {}", id, e);
            Err(map_domain_error(&e))
        }
    }
}

/// Update an existing user; only supplied fields change
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    operation_id = "quotes_info.update_user",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserReq,
    responses(
        (status = 200, description = "User updated", body = Envelope<UserDto>),
        (status = 400, description = "Invalid input or email already registered", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope),
    )
)]
pub async fn update_user(
    Extension(svc): Extension<Arc<UserService>>,
    PathParam(id): PathParam<i32>,
    JsonBody(req_body): JsonBody<UpdateUserReq>,
) -> ApiResult<Envelope<UserDto>> {
    info!("Updating user {} with: {:?}", id, req_body);

    match svc.update_user(id, req_body.into()).await {
        Ok(user) => Ok(Json(Envelope::ok(
            "User updated successfully",
            UserDto::from(user),
        ))),
        Err(e) => {
            error!("Failed to update user {}: {}", id, e);
            Err(map_domain_error(&e))
        }
    }
}

/// Delete a user by ID, returning the removed record
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    operation_id = "quotes_info.delete_user",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = Envelope<UserDto>),
        (status = 400, description = "User still has quotes", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope),
    )
)]
pub async fn delete_user(
    Extension(svc): Extension<Arc<UserService>>,
    PathParam(id): PathParam<i32>,
) -> ApiResult<Envelope<UserDto>> {
    info!("Deleting user: {}", id);

    match svc.delete_user(id).await {
        Ok(user) => Ok(Json(Envelope::ok(
            "User deleted successfully",
            UserDto::from(user),
        ))),
        Err(e) => {
            error!("Failed to delete user {}: {}", id, e);
            Err(map_domain_error(&e))
        }
    }
}

// ----------------------------- quotes -----------------------------

/// Create a new quote
#[utoipa::path(
    post,
    path = "/quotes/",
    tag = "quotes",
    operation_id = "quotes_info.create_quote",
    request_body = CreateQuoteReq,
    responses(
        (status = 201, description = "Quote created", body = Envelope<QuoteDto>),
        (status = 400, description = "Invalid input or unknown author", body = ErrorEnvelope),
        (status = 500, description = "Internal error", body = ErrorEnvelope),
    )
)]
pub async fn create_quote(
    Extension(svc): Extension<Arc<QuoteService>>,
    JsonBody(req_body): JsonBody<CreateQuoteReq>,
) -> Result<(StatusCode, Json<Envelope<QuoteDto>>), ApiError> {
    info!("Creating quote for author {}", req_body.author);

    match svc.create_quote(req_body.into()).await {
        Ok(quote) => Ok((
            StatusCode::CREATED,
            Json(Envelope::ok(
                "Quote created successfully",
                QuoteDto::from(quote),
            )),
        )),
        Err(e) => {
            error!("Failed to create quote: {}", e);
            Err(map_domain_error(&e))
        }
    }
}

/// List quotes, newest first, with pagination and filtering
#[utoipa::path(
    get,
    path = "/quotes/",
    tag = "quotes",
    operation_id = "quotes_info.list_quotes",
    params(ListQuotesQuery),
    responses(
        (status = 200, description = "Page of quotes", body = ListEnvelope<QuoteDto>),
        (status = 400, description = "Invalid pagination parameters", body = ErrorEnvelope),
        (status = 500, description = "Internal error", body = ErrorEnvelope),
    )
)]
pub async fn list_quotes(
    Extension(svc): Extension<Arc<QuoteService>>,
    QueryParams(query): QueryParams<ListQuotesQuery>,
) -> ApiResult<ListEnvelope<QuoteDto>> {
    info!("Listing quotes with query: {:?}", query);

    let (filter, page) = query.into_parts();
    match svc.list_quotes(filter, page).await {
        Ok(page) => {
            let message = format!("Retrieved {} quotes", page.items.len());
            Ok(Json(ListEnvelope::from_page(message, page.map(QuoteDto::from))))
        }
        Err(e) => {
            error!("Failed to list quotes: {}", e);
            Err(map_domain_error(&e))
        }
    }
}

#[utoipa::path(
    get,
    path = "/quotes/{id}",
    tag = "quotes",
    operation_id = "quotes_info.get_quote",
    params(("id" = i32, Path, description = "Quote id")),
    responses(
        (status = 200, description = "Quote found", body = Envelope<QuoteDto>),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 404, description = "Quote not found", body = ErrorEnvelope),
    )
)]
pub async fn get_quote(
    Extension(svc): Extension<Arc<QuoteService>>,
    PathParam(id): PathParam<i32>,
) -> ApiResult<Envelope<QuoteDto>> {
    info!("Getting quote with id: {}", id);

    match svc.get_quote(id).await {
        Ok(quote) => Ok(Json(Envelope::ok(
            "Quote retrieved successfully",
            QuoteDto::from(quote),
        ))),
        Err(e) => {
            error!("Failed to get quote {}: {}", id, e);
            Err(map_domain_error(&e))
        }
    }
}

#[utoipa::path(
    put,
    path = "/quotes/{id}",
    tag = "quotes",
    operation_id = "quotes_info.update_quote",
    params(("id" = i32, Path, description = "Quote id")),
    request_body = UpdateQuoteReq,
    responses(
        (status = 200, description = "Quote updated", body = Envelope<QuoteDto>),
        (status = 400, description = "Invalid input or unknown author", body = ErrorEnvelope),
        (status = 404, description = "Quote not found", body = ErrorEnvelope),
    )
)]
pub async fn update_quote(
    Extension(svc): Extension<Arc<QuoteService>>,
    PathParam(id): PathParam<i32>,
    JsonBody(req_body): JsonBody<UpdateQuoteReq>,
) -> ApiResult<Envelope<QuoteDto>> {
    info!("Updating quote {} with: {:?}", id, req_body);

    match svc.update_quote(id, req_body.into()).await {
        Ok(quote) => Ok(Json(Envelope::ok(
            "Quote updated successfully",
            QuoteDto::from(quote),
        ))),
        Err(e) => {
            error!("Failed to update quote {}: {}", id, e);
            Err(map_domain_error(&e))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/quotes/{id}",
    tag = "quotes",
    operation_id = "quotes_info.delete_quote",
    params(("id" = i32, Path, description = "Quote id")),
    responses(
        (status = 200, description = "Quote deleted", body = Envelope<QuoteDto>),
        (status = 404, description = "Quote not found", body = ErrorEnvelope),
    )
)]
pub async fn delete_quote(
    Extension(svc): Extension<Arc<QuoteService>>,
    PathParam(id): PathParam<i32>,
) -> ApiResult<Envelope<QuoteDto>> {
    info!("Deleting quote: {}", id);

    match svc.delete_quote(id).await {
        Ok(quote) => Ok(Json(Envelope::ok(
            "Quote deleted successfully",
            QuoteDto::from(quote),
        ))),
        Err(e) => {
            error!("Failed to delete quote {}: {}", id, e);
            Err(map_domain_error(&e))
        }
    }
}
