//! Route definitions for the wizard meme generation endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::wizard;
use crate::state::AppState;

/// Routes mounted at `/wizard`.
///
/// ```text
/// POST   /backgrounds               -> generate_backgrounds
/// POST   /quotes                    -> generate_quotes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/backgrounds", post(wizard::generate_backgrounds))
        .route("/quotes", post(wizard::generate_quotes))
}
