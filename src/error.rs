//! Handler error type and its translation to HTTP responses.
//!
//! `AppError::into_response` is the one place internal failures become an
//! external status code and `ErrorResponse` body. The panic handler below
//! produces the same shape for faults that escape as panics.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::telemetry::TelemetryError;

pub const NOT_FOUND: &str = "Not Found";
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// JSON body returned for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self {
            error: NOT_FOUND.to_string(),
            path: Some(path.into()),
            message: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: INTERNAL_SERVER_ERROR.to_string(),
            path: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Telemetry(#[from] TelemetryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Internal error: {:?}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(self.to_string())),
        )
            .into_response()
    }
}

/// Last-resort handler for panics caught by `CatchPanicLayer`.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    tracing::error!(error = %message, "Handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal(message)),
    )
        .into_response()
}
