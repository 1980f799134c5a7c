use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::{openapi::QuotesApiDoc, routes};
use crate::config::QuotesInfoConfig;
use crate::contract::client::QuotesInfoApi;
use crate::domain::service::{QuoteService, ServiceConfig, UserService};
use crate::gateways::local::QuotesInfoLocalClient;
use crate::infra::storage::{migrations::Migrator, SeaOrmQuotesRepository, SeaOrmUsersRepository};

/// Module wiring: configuration, repositories, services and the REST surface.
#[derive(Clone)]
pub struct QuotesInfo {
    db: DatabaseConnection,
    users: Arc<UserService>,
    quotes: Arc<QuoteService>,
}

impl QuotesInfo {
    /// Key of this module's section under `modules:` in the app config.
    pub const NAME: &'static str = "quotes_info";

    pub fn init(db: DatabaseConnection, cfg: &QuotesInfoConfig) -> anyhow::Result<Self> {
        info!("Initializing quotes_info module");

        cfg.validate()?;
        debug!(
            "Loaded quotes_info config: default_page_size={}, max_page_size={}",
            cfg.default_page_size, cfg.max_page_size
        );

        // Wire repositories (infra) to domain services (ports)
        let service_config = ServiceConfig::from(cfg);
        let users = UserService::new(
            Arc::new(SeaOrmUsersRepository::new(db.clone())),
            service_config.clone(),
        );
        let quotes = QuoteService::new(
            Arc::new(SeaOrmQuotesRepository::new(db.clone())),
            service_config,
        );

        Ok(Self {
            db,
            users: Arc::new(users),
            quotes: Arc::new(quotes),
        })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        info!("Running quotes_info database migrations");
        Migrator::up(&self.db, None).await?;
        info!("quotes_info database migrations completed successfully");
        Ok(())
    }

    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        info!("Registering quotes_info REST routes");
        routes::register_routes(router, self.users.clone(), self.quotes.clone())
    }

    pub fn openapi(&self) -> utoipa::openapi::OpenApi {
        use utoipa::OpenApi;
        QuotesApiDoc::openapi()
    }

    /// Local in-process client for other modules.
    pub fn client(&self) -> Arc<dyn QuotesInfoApi> {
        Arc::new(QuotesInfoLocalClient::new(
            self.users.clone(),
            self.quotes.clone(),
        ))
    }
}
