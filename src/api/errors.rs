use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use crate::search::SearchError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request-level failures. Individual site failures never reach this type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid JSON body")]
    InvalidJson(String),

    #[error("Invalid query provided")]
    InvalidQuery,

    #[error("Request body too large")]
    PayloadTooLarge,

    /// The display text is what callers see; the source stays in the logs.
    #[error("Internal Server Error")]
    Internal(#[from] SearchError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson(_) | ApiError::InvalidQuery => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::InvalidJson(detail) => {
                warn!(detail = %detail, "rejected malformed request body")
            }
            ApiError::InvalidQuery => warn!("rejected missing or empty query"),
            ApiError::PayloadTooLarge => warn!("rejected oversized request body"),
            ApiError::Internal(e) => error!(error = %e, "dataset search failed"),
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
