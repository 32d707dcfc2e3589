//! Error types for the Observer API server.
//!
//! [`ApiError`] unifies every failure a handler can return and converts
//! into an Axum response with a `{"error", "status"}` JSON body.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hunters_core::tick::TickError;
use hunters_core::{CommandError, ErrorKind};

/// Errors that can occur in the Observer API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The command gateway rejected the request.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The request body was missing, not JSON, or the wrong shape.
    #[error("invalid request body: {0}")]
    Body(String),

    /// A well-formed request carried an out-of-range value.
    #[error("invalid request: {0}")]
    BadRequest(String),

    /// The world could not advance.
    #[error("tick failed: {0}")]
    Tick(#[from] TickError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection.body_text())
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Command(e) => match e.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::Conflict => StatusCode::CONFLICT,
            },
            Self::Body(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Tick(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
