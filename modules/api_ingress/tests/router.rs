use axum::{
    body::Body,
    extract::Extension,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use tokio_util::sync::CancellationToken;
use tower::util::ServiceExt; // for `oneshot`

use api_ingress::request_id::XRequestId;
use api_ingress::{ApiIngress, ApiIngressConfig, ServiceInfo};

fn ingress(config: ApiIngressConfig) -> ApiIngress {
    ApiIngress::new(config, ServiceInfo::new("Quotes API", "1.2.3"))
}

fn module_routes() -> Router {
    Router::new()
        .route(
            "/echo-request-id",
            get(|Extension(rid): Extension<XRequestId>| async move { rid.0 }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(std::time::Duration::from_secs(10)).await;
                "done"
            }),
        )
}

fn app(config: ApiIngressConfig) -> Router {
    let ingress = ingress(config);
    let doc = ingress.build_openapi(Vec::new());
    ingress.build_router(module_routes(), doc)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_status_and_version() {
    let response = app(ApiIngressConfig::default())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], "1.2.3");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn root_returns_service_metadata() {
    let response = app(ApiIngressConfig::default())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Welcome to the Quotes API");
    assert_eq!(json["version"], "1.2.3");
    assert_eq!(json["docs"], "/docs");
}

#[tokio::test]
async fn generates_request_id_when_missing() {
    let response = app(ApiIngressConfig::default())
        .oneshot(
            Request::builder()
                .uri("/echo-request-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let header = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("x-request-id should be generated");
    assert!(!header.is_empty());

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), header);
}

#[tokio::test]
async fn preserves_incoming_request_id() {
    let response = app(ApiIngressConfig::default())
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok());
    assert_eq!(request_id, Some("abc-123"));
}

#[tokio::test]
async fn openapi_document_lists_service_paths() {
    let response = app(ApiIngressConfig::default())
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["info"]["title"], "Quotes API");
    assert!(json.pointer("/paths/~1health/get").is_some());
    assert!(json.pointer("/paths/~1/get").is_some());
}

#[tokio::test]
async fn docs_page_can_be_disabled() {
    let enabled = app(ApiIngressConfig::default())
        .oneshot(Request::builder().uri("/docs").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(enabled.status(), StatusCode::OK);

    let config = ApiIngressConfig {
        enable_docs: false,
        ..Default::default()
    };
    let disabled = app(config)
        .oneshot(Request::builder().uri("/docs").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(disabled.status(), StatusCode::NOT_FOUND);
}

#[test]
fn bind_addr_requires_valid_socket_address() {
    assert!(ingress(ApiIngressConfig::default()).bind_addr().is_err());

    let bad = ingress(ApiIngressConfig {
        bind_addr: Some("not-an-addr".into()),
        ..Default::default()
    });
    assert!(bad.bind_addr().is_err());

    let good = ingress(ApiIngressConfig {
        bind_addr: Some("127.0.0.1:8000".into()),
        ..Default::default()
    });
    assert_eq!(good.bind_addr().unwrap().port(), 8000);
}

#[tokio::test]
async fn serve_stops_on_cancellation() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(api_ingress::serve_with_listener(
        listener,
        app(ApiIngressConfig::default()),
        cancel.clone(),
    ));

    cancel.cancel();
    let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .expect("server task panicked");
    assert!(result.is_ok());
}

#[tokio::test]
async fn slow_handlers_time_out_with_408() {
    let config = ApiIngressConfig {
        request_timeout_secs: 1,
        ..Default::default()
    };
    let started = std::time::Instant::now();
    let response = app(config)
        .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
}
