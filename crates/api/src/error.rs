use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use meme_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and JSON body rejections.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
/// Messages are passed through to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `meme_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The request body was not valid JSON for the endpoint.
    #[error(transparent)]
    InvalidBody(#[from] JsonRejection),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Core(core) => match core {
                CoreError::RepositoryNotFound { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "REPOSITORY_NOT_FOUND")
                }
                CoreError::ScriptMissing { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "SCRIPT_MISSING")
                }
                CoreError::ScriptLoadFailed { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "SCRIPT_LOAD_FAILED")
                }
                CoreError::NoItemsAvailable(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "NO_ITEMS_AVAILABLE")
                }
                CoreError::ZeroRequested(_) => (StatusCode::BAD_REQUEST, "NOTHING_TO_GENERATE"),
                CoreError::UpstreamGeneration(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "GENERATION_FAILED")
                }
            },
            AppError::InvalidBody(rejection) => (rejection.status(), "INVALID_BODY"),
        };

        let message = match &self {
            AppError::InvalidBody(rejection) => rejection.body_text(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(error = %message, code, "Request failed");
        }

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
