use std::sync::Arc;

use axum::{
    response::{Html, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Static service identity served by `/` and `/health`.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub title: String,
    pub version: String,
    pub docs_path: String,
}

impl ServiceInfo {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            docs_path: "/docs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RootInfo {
    pub message: String,
    pub version: String,
    pub docs: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// Service metadata
#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    responses((status = 200, description = "Service metadata", body = RootInfo))
)]
pub async fn root(Extension(info): Extension<Arc<ServiceInfo>>) -> Json<RootInfo> {
    Json(RootInfo {
        message: format!("Welcome to the {}", info.title),
        version: info.version.clone(),
        docs: info.docs_path.clone(),
    })
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses((status = 200, description = "Service is alive", body = HealthStatus))
)]
pub async fn health_check(Extension(info): Extension<Arc<ServiceInfo>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: info.version.clone(),
    })
}

pub async fn openapi_json(
    Extension(doc): Extension<Arc<utoipa::openapi::OpenApi>>,
) -> Json<utoipa::openapi::OpenApi> {
    Json(doc.as_ref().clone())
}

pub async fn serve_docs() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>API Docs</title>
  <script src="https://unpkg.com/@stoplight/elements@latest/web-components.min.js"></script>
  <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements@latest/styles.min.css">
</head>
<body>
  <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar"></elements-api>
</body>
</html>"#,
    )
}
