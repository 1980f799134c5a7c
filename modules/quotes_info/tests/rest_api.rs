//! REST layer exercised through the real route registration, plus one pass
//! through the full ingress stack.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use api_ingress::{ApiIngress, ApiIngressConfig, ServiceInfo};
use common::{assert_error_envelope, create_test_module, create_test_router, send};

#[tokio::test]
async fn user_crud_uses_envelopes() {
    let router = create_test_router().await;

    let (status, body) = send(
        &router,
        Method::POST,
        "/users/",
        Some(json!({"name": "Ada", "email": "ada@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["data"]["name"], "Ada");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&router, Method::GET, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User retrieved successfully");
    assert_eq!(body["data"]["email"], "ada@example.com");

    let (status, body) = send(
        &router,
        Method::PUT,
        &format!("/users/{id}"),
        Some(json!({"name": "Ada Lovelace"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User updated successfully");
    assert_eq!(body["data"]["name"], "Ada Lovelace");
    assert_eq!(body["data"]["email"], "ada@example.com");

    let (status, body) = send(&router, Method::DELETE, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");
    assert_eq!(body["data"]["id"], id);

    let (status, body) = send(&router, Method::GET, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_envelope(&body);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn list_envelope_carries_pagination() {
    let router = create_test_router().await;
    for i in 0..3 {
        let (status, _) = send(
            &router,
            Method::POST,
            "/users",
            Some(json!({"name": format!("User {i}"), "email": format!("u{i}@example.com")})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&router, Method::GET, "/users/?page=1&per_page=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Retrieved 2 users");
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // no trailing slash, defaults applied
    let (status, body) = send(&router, Method::GET, "/users?name=user%202", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["per_page"], 10);
}

#[tokio::test]
async fn duplicate_email_is_a_400_envelope() {
    let router = create_test_router().await;
    let payload = json!({"name": "Twin", "email": "twin@example.com"});

    let (status, _) = send(&router, Method::POST, "/users/", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&router, Method::POST, "/users/", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body);
    assert_eq!(body["message"], "User with this email already exists");
}

#[tokio::test]
async fn malformed_input_yields_400_envelopes() {
    let router = create_test_router().await;

    let cases = [
        (Method::GET, "/users/?per_page=0", None),
        (Method::GET, "/users/?per_page=101", None),
        (Method::GET, "/users/?page=0", None),
        (Method::GET, "/quotes/?per_page=abc", None),
        (Method::GET, "/users/not-a-number", None),
        (
            Method::POST,
            "/users/",
            Some(json!({"name": "No email"})),
        ),
        (
            Method::POST,
            "/users/",
            Some(json!({"name": "Bad", "email": "nope"})),
        ),
        (
            Method::POST,
            "/users/",
            Some(json!({"name": "", "email": "empty@example.com"})),
        ),
        (
            Method::POST,
            "/quotes/",
            Some(json!({"text": "typed wrong", "author": "one"})),
        ),
    ];

    for (method, uri, body) in cases {
        let (status, response) = send(&router, method.clone(), uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}: {response}");
        assert_error_envelope(&response);
    }
}

#[tokio::test]
async fn invalid_json_syntax_is_rejected() {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    let router = create_test_router().await;
    let response = router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/users/")
                .header("content-type", "application/json")
                .body(Body::from("{\"name\": "))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_error_envelope(&body);
}

#[tokio::test]
async fn quote_lifecycle_and_author_rules() {
    let router = create_test_router().await;

    let (_, body) = send(
        &router,
        Method::POST,
        "/users/",
        Some(json!({"name": "Seneca", "email": "seneca@rome.example"})),
    )
    .await;
    let author = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &router,
        Method::POST,
        "/quotes/",
        Some(json!({"text": "Luck is what happens when preparation meets opportunity.", "author": 999})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body);
    assert_eq!(body["message"], "Author with id 999 does not exist");

    let (status, body) = send(
        &router,
        Method::POST,
        "/quotes",
        Some(json!({"text": "We suffer more in imagination than in reality.", "category": "stoic", "author": author})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Quote created successfully");
    assert_eq!(body["data"]["category"], "stoic");
    let quote_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &router,
        Method::GET,
        &format!("/quotes/?category=stoic&author={author}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Retrieved 1 quotes");
    assert_eq!(body["total"], 1);

    let (status, body) = send(&router, Method::DELETE, &format!("/users/{author}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body);
    assert_eq!(body["message"], format!("User {author} still has 1 quotes"));

    let (status, body) = send(
        &router,
        Method::PUT,
        &format!("/quotes/{quote_id}"),
        Some(json!({"category": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Quote updated successfully");
    assert!(body["data"]["category"].is_null());

    let (status, body) = send(&router, Method::GET, &format!("/quotes/{quote_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Quote retrieved successfully");

    let (status, body) = send(&router, Method::DELETE, &format!("/quotes/{quote_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Quote deleted successfully");

    let (status, body) = send(&router, Method::DELETE, &format!("/quotes/{quote_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Quote not found");
}

#[tokio::test]
async fn module_routes_served_through_ingress() {
    let module = create_test_module().await;
    let ingress = ApiIngress::new(
        ApiIngressConfig::default(),
        ServiceInfo::new("Quotes API", "1.0.0"),
    );
    let openapi = ingress.build_openapi(vec![module.openapi()]);
    let router = ingress.build_router(module.register_rest(axum::Router::new()), openapi);

    let (status, body) = send(&router, Method::GET, "/users/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);

    let (status, doc) = send(&router, Method::GET, "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc.pointer("/paths/~1users~1/post").is_some());
    assert!(doc.pointer("/paths/~1quotes~1{id}/delete").is_some());
    assert!(doc.pointer("/paths/~1health/get").is_some());
    assert!(doc.pointer("/components/schemas/UserDto").is_some());
}
