use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Resolved Porchroot Auto checkout.
    pub porchroot_dir: String,
}

/// GET /health -- verifies the Porchroot Auto repo can be found.
async fn health_check(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    let root = state.locator.resolve()?;

    Ok(Json(HealthResponse {
        status: "ok",
        porchroot_dir: root.display().to_string(),
    }))
}

/// Mount health check routes at the root level.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
