//! Handlers for the wizard meme generation endpoints.
//!
//! Each request reloads its generator script, so edits in the Porchroot
//! checkout take effect without restarting the adapter.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use meme_core::generation::{self, GenerationReport, MEMES_SCRIPT, QUOTES_SCRIPT};

use crate::error::AppResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body shared by both generation endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    /// Number of items to generate; the endpoint picks a default when absent.
    #[serde(default)]
    pub count: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /wizard/backgrounds
///
/// Generate wizard backgrounds via `generate_wizard_memes.py`, using the
/// first `count` prompts (all of them by default).
pub async fn generate_backgrounds(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> AppResult<Json<GenerationReport>> {
    let Json(body) = payload?;

    let module = state
        .registry
        .load(state.loader.as_ref(), MEMES_SCRIPT)
        .await?;
    let report = generation::generate_backgrounds(module.as_ref(), body.count).await?;

    tracing::info!(
        requested = report.requested,
        generated = report.generated,
        output_dir = %report.output_dir,
        "Wizard backgrounds generated"
    );
    Ok(Json(report))
}

/// POST /wizard/quotes
///
/// Generate quote memes via `generate_wizard_quote_images.py` for a random
/// sample of `count` quotes (5 by default).
pub async fn generate_quotes(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> AppResult<Json<GenerationReport>> {
    let Json(body) = payload?;

    let module = state
        .registry
        .load(state.loader.as_ref(), QUOTES_SCRIPT)
        .await?;
    let mut rng = StdRng::from_os_rng();
    let report = generation::generate_quotes(module.as_ref(), body.count, &mut rng).await?;

    tracing::info!(
        requested = report.requested,
        generated = report.generated,
        output_dir = %report.output_dir,
        "Wizard quotes generated"
    );
    Ok(Json(report))
}
