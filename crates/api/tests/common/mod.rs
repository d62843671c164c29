#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use meme_api::config::ServerConfig;
use meme_api::router::build_app_router;
use meme_api::state::AppState;
use meme_core::locator::RepoLocator;
use meme_core::scripting::memory::InMemoryLoader;
use meme_core::scripting::registry::ModuleRegistry;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:4000".to_string()],
        python_bin: "python3".to_string(),
    }
}

/// State backed by in-memory scripts and a fixed repository directory.
pub fn test_state(repo: &Path, loader: InMemoryLoader) -> AppState {
    AppState {
        config: Arc::new(test_config()),
        locator: RepoLocator::fixed(repo),
        loader: Arc::new(loader),
        registry: Arc::new(ModuleRegistry::new()),
    }
}

/// Build the full application router, with the production middleware stack,
/// over the given state.
pub fn build_test_app(state: AppState) -> Router {
    build_app_router(state)
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

/// Send a POST request with a raw body labelled as JSON.
pub async fn post_raw(app: Router, uri: &str, body: String) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
