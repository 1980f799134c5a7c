//! HTTP host for the quotes server: owns the middleware stack, the service
//! endpoints (`/`, `/health`, `/openapi.json`, `/docs`) and the serve loop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{http::StatusCode, middleware::from_fn, routing::get, Extension, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use utoipa::OpenApi;

mod config;
pub mod request_id;
pub mod web;

pub use config::ApiIngressConfig;
pub use web::ServiceInfo;

#[derive(OpenApi)]
#[openapi(
    paths(web::root, web::health_check),
    components(schemas(web::RootInfo, web::HealthStatus)),
    tags((name = "service", description = "Service metadata and liveness"))
)]
struct IngressDoc;

/// Owns the HTTP server and merges module routes and OpenAPI documents
/// into a single router.
pub struct ApiIngress {
    config: ApiIngressConfig,
    info: Arc<ServiceInfo>,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig, info: ServiceInfo) -> Self {
        Self {
            config,
            info: Arc::new(info),
        }
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Combine the ingress OpenAPI document with the ones contributed by modules.
    pub fn build_openapi(&self, module_docs: Vec<utoipa::openapi::OpenApi>) -> utoipa::openapi::OpenApi {
        let mut doc = IngressDoc::openapi();
        for module_doc in module_docs {
            doc.merge(module_doc);
        }
        doc.info.title = self.info.title.clone();
        doc.info.version = self.info.version.clone();
        doc
    }

    /// Build the HTTP router around module routes.
    ///
    /// Middleware order (outermost first):
    /// SetRequestId -> PropagateRequestId -> Trace -> Timeout -> push_req_id_to_extensions -> BodyLimit
    pub fn build_router(&self, module_routes: Router, openapi: utoipa::openapi::OpenApi) -> Router {
        let mut router = Router::new()
            .route("/", get(web::root))
            .route("/health", get(web::health_check))
            .route("/openapi.json", get(web::openapi_json));

        if self.config.enable_docs {
            router = router.route("/docs", get(web::serve_docs));
        }

        let mut router = router
            .merge(module_routes)
            .layer(Extension(self.info.clone()))
            .layer(Extension(Arc::new(openapi)));

        let x_request_id = request_id::header();
        let timeout = Duration::from_secs(self.config.request_timeout_secs.max(1));

        router = router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    request_id::MakeReqId,
                ))
                .layer(PropagateRequestIdLayer::new(x_request_id))
                .layer(request_id::create_trace_layer())
                .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
                .layer(from_fn(request_id::push_req_id_to_extensions))
                .layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes)),
        );

        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    /// Parse the configured listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let raw = self
            .config
            .bind_addr
            .as_deref()
            .context("api_ingress.bind_addr is not set")?;
        raw.parse()
            .with_context(|| format!("Invalid bind address '{raw}'"))
    }

    /// Bind the configured address and serve until `cancel` fires.
    pub async fn serve(&self, router: Router, cancel: CancellationToken) -> Result<()> {
        let addr = self.bind_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        serve_with_listener(listener, router, cancel).await
    }
}

/// Serve on an already bound listener with graceful shutdown on cancellation.
pub async fn serve_with_listener(
    listener: TcpListener,
    router: Router,
    cancel: CancellationToken,
) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("HTTP server bound on {}", addr);

    let shutdown = async move {
        cancel.cancelled().await;
        tracing::info!("HTTP server shutting down gracefully (cancellation)");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
