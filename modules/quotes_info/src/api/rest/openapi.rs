use utoipa::OpenApi;

use crate::api::rest::dto::{
    CreateQuoteReq, CreateUserReq, QuoteDto, UpdateQuoteReq, UpdateUserReq, UserDto,
};
use crate::api::rest::envelope::ErrorEnvelope;
use crate::api::rest::handlers;

/// OpenAPI fragment for the users and quotes endpoints.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_user,
        handlers::list_users,
        handlers::get_user,
        handlers::update_user,
        handlers::delete_user,
        handlers::create_quote,
        handlers::list_quotes,
        handlers::get_quote,
        handlers::update_quote,
        handlers::delete_quote,
    ),
    components(schemas(
        UserDto,
        CreateUserReq,
        UpdateUserReq,
        QuoteDto,
        CreateQuoteReq,
        UpdateQuoteReq,
        ErrorEnvelope,
    )),
    tags(
        (name = "users", description = "Quote authors"),
        (name = "quotes", description = "Quotes attributed to users"),
    )
)]
pub struct QuotesApiDoc;
