//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use meme_core::scripting::memory::InMemoryLoader;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with the resolved repository path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_repo_dir() {
    let repo = tempfile::tempdir().unwrap();
    let app = common::build_test_app(common::test_state(repo.path(), InMemoryLoader::new(repo.path())));

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["porchroot_dir"], repo.path().display().to_string());
}

// ---------------------------------------------------------------------------
// Test: GET /health returns 500 when the repository is missing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_fails_when_repo_missing() {
    let missing = std::path::Path::new("/nonexistent/porchroot-auto");
    let app = common::build_test_app(common::test_state(missing, InMemoryLoader::new(missing)));

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "REPOSITORY_NOT_FOUND");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("/nonexistent/porchroot-auto"));
    assert!(message.contains("PORCHROOT_AUTO_DIR"));
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let repo = tempfile::tempdir().unwrap();
    let app = common::build_test_app(common::test_state(repo.path(), InMemoryLoader::new(repo.path())));

    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let repo = tempfile::tempdir().unwrap();
    let app = common::build_test_app(common::test_state(repo.path(), InMemoryLoader::new(repo.path())));

    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(
        request_id.to_str().unwrap().len(),
        36,
        "x-request-id should be a UUID string"
    );
}

// ---------------------------------------------------------------------------
// Test: CORS preflight OPTIONS request returns correct headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_returns_correct_headers() {
    let repo = tempfile::tempdir().unwrap();
    let app = common::build_test_app(common::test_state(repo.path(), InMemoryLoader::new(repo.path())));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/wizard/quotes")
        .header("Origin", "http://localhost:4000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .expect("Missing Access-Control-Allow-Origin header")
            .to_str()
            .unwrap(),
        "http://localhost:4000"
    );
    let allow_methods = headers
        .get("access-control-allow-methods")
        .expect("Missing Access-Control-Allow-Methods header")
        .to_str()
        .unwrap();
    assert!(
        allow_methods.contains("POST"),
        "Allow-Methods should contain POST, got: {allow_methods}"
    );
}

// ---------------------------------------------------------------------------
// Test: CORS origins come from the state's server configuration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_uses_origins_from_state_config() {
    let repo = tempfile::tempdir().unwrap();
    let mut state = common::test_state(repo.path(), InMemoryLoader::new(repo.path()));
    let mut config = common::test_config();
    config.cors_origins = vec!["http://wizard.local:5173".to_string()];
    state.config = std::sync::Arc::new(config);
    let app = common::build_test_app(state);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/wizard/backgrounds")
        .header("Origin", "http://wizard.local:5173")
        .header("Access-Control-Request-Method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .expect("Missing Access-Control-Allow-Origin header")
            .to_str()
            .unwrap(),
        "http://wizard.local:5173"
    );
}
