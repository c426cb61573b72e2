//! Not-found handler for unmatched paths and methods.

use axum::{
    http::{StatusCode, Uri},
    Json,
};

use crate::error::ErrorResponse;

/// Returns 404 with the request path (query string excluded).
pub async fn not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    tracing::debug!(path = %uri.path(), "No route matched");
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::not_found(uri.path())),
    )
}
