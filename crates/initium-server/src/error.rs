use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use initium_core::error::StoreError;

/// Application-level errors that map directly to HTTP responses.
///
/// Every variant implements [`IntoResponse`] so Axum handlers can use
/// `Result<impl IntoResponse, AppError>` as their return type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid tracking id")]
    InvalidTrackingId,

    #[error("analytics not configured")]
    NotConfigured,

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::InvalidTrackingId => (
                StatusCode::BAD_REQUEST,
                "invalid_tracking_id",
                "Invalid tracking ID".to_string(),
            ),
            AppError::NotConfigured => {
                tracing::error!("No website registered; add one to websites.json");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "not_configured",
                    "Analytics not configured".to_string(),
                )
            }
            AppError::StoreUnavailable(e) => {
                tracing::error!(error = %e, "Store unavailable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "store_unavailable",
                    "Server error: storage unavailable".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(json!({
                "error": {
                    "code": code,
                    "message": message,
                    "field": null
                }
            })),
        )
            .into_response()
    }
}
