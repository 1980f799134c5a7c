use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::{QuoteService, UserService};

/// Register the users and quotes routes, with and without trailing slash on
/// the collection paths.
pub fn register_routes(
    router: Router,
    users: Arc<UserService>,
    quotes: Arc<QuoteService>,
) -> Router {
    let routes = Router::new()
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route(
            "/quotes",
            get(handlers::list_quotes).post(handlers::create_quote),
        )
        .route(
            "/quotes/",
            get(handlers::list_quotes).post(handlers::create_quote),
        )
        .route(
            "/quotes/{id}",
            get(handlers::get_quote)
                .put(handlers::update_quote)
                .delete(handlers::delete_quote),
        )
        .layer(Extension(users))
        .layer(Extension(quotes));

    router.merge(routes)
}
