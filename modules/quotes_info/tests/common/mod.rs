//! Shared fixtures: every test gets a fresh in-memory SQLite with migrations.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;

use quotes_info::config::QuotesInfoConfig;
use quotes_info::domain::service::{QuoteService, ServiceConfig, UserService};
use quotes_info::infra::storage::{
    migrations::Migrator, SeaOrmQuotesRepository, SeaOrmUsersRepository,
};
use quotes_info::QuotesInfo;
use sea_orm_migration::MigratorTrait;

pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub struct Services {
    pub db: DatabaseConnection,
    pub users: Arc<UserService>,
    pub quotes: Arc<QuoteService>,
}

/// File-backed SQLite with a real connection pool, for tests that need
/// several writers at once.
pub async fn create_file_db(dir: &std::path::Path, max_connections: u32) -> DatabaseConnection {
    let path = dir.join("quotes.db").to_string_lossy().replace('\\', "/");
    let mut opts = ConnectOptions::new(format!("sqlite://{path}?mode=rwc"));
    opts.max_connections(max_connections).sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to file database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn create_test_services() -> Services {
    services_over(create_test_db().await)
}

pub fn services_over(db: DatabaseConnection) -> Services {
    let config = ServiceConfig::default();
    Services {
        users: Arc::new(UserService::new(
            Arc::new(SeaOrmUsersRepository::new(db.clone())),
            config.clone(),
        )),
        quotes: Arc::new(QuoteService::new(
            Arc::new(SeaOrmQuotesRepository::new(db.clone())),
            config,
        )),
        db,
    }
}

pub async fn create_test_module() -> QuotesInfo {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    let module = QuotesInfo::init(db, &QuotesInfoConfig::default()).expect("init module");
    module.migrate().await.expect("Failed to run migrations");
    module
}

pub async fn create_test_router() -> Router {
    create_test_module().await.register_rest(Router::new())
}

/// Send one request and decode the JSON body.
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn assert_error_envelope(body: &Value) {
    assert_eq!(body["success"], false, "{body}");
    assert!(body["data"].is_null(), "{body}");
    assert!(body["message"].is_string(), "{body}");
}
