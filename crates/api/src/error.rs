//! HTTP mapping of domain errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use spendview_domain::SpendViewError;
use tracing::{error, warn};

/// Error returned by JSON handlers
#[derive(Debug)]
pub enum ApiError {
    /// No valid session cookie
    Unauthorized,
    /// Malformed request parameters
    BadRequest(String),
    Domain(SpendViewError),
}

impl From<SpendViewError> for ApiError {
    fn from(err: SpendViewError) -> Self {
        Self::Domain(err)
    }
}

/// Status code for a domain error at the HTTP boundary.
pub fn status_for(err: &SpendViewError) -> StatusCode {
    match err {
        SpendViewError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        SpendViewError::StateValidation(_) => StatusCode::BAD_REQUEST,
        SpendViewError::AccessDenied(_) => StatusCode::FORBIDDEN,
        SpendViewError::NotFound(_) => StatusCode::NOT_FOUND,
        SpendViewError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        SpendViewError::UpstreamAuth { .. }
        | SpendViewError::UpstreamResource { .. }
        | SpendViewError::Network(_) => StatusCode::BAD_GATEWAY,
        SpendViewError::Config(_) | SpendViewError::Auth(_) | SpendViewError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized", "message": "Sign in to continue" })),
            )
                .into_response(),
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "InvalidRequest", "message": message })),
            )
                .into_response(),
            Self::Domain(err) => {
                let status = status_for(&err);
                if status.is_server_error() {
                    error!(error = %err, %status, "request failed");
                } else {
                    warn!(error = %err, %status, "request rejected");
                }
                (status, Json(json!({ "error": err.reason_code(), "message": err.to_string() })))
                    .into_response()
            }
        }
    }
}
