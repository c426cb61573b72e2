//! HTTP route handlers.
//!
//! `/health` and `/metrics` are probe routes and are marked `no-store` so no
//! intermediary serves a cached answer. Anything unmatched, by path or by
//! method, falls through to the JSON 404 handler.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod fallback;
pub mod health;
pub mod metrics;
pub mod root;

use axum::{middleware, routing::get, Router};
use chrono::{SecondsFormat, Utc};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::error::handle_panic;
use crate::middleware::request_id_layer;
use crate::state::AppState;

pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

/// Current time as ISO-8601 UTC with millisecond precision, e.g.
/// `2024-05-01T12:00:00.123Z`.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Creates the Axum router with all routes, fallbacks and middleware.
pub fn create_router(state: AppState) -> Router {
    // Probes - never cached
    let probe_routes = Router::new()
        .route("/health", get(health::health))
        .route("/metrics", get(metrics::metrics))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    let root_routes = Router::new().route("/", get(root::index));

    Router::new()
        .merge(probe_routes)
        .merge(root_routes)
        .fallback(fallback::not_found)
        .method_not_allowed_fallback(fallback::not_found)
        .with_state(state)
        // Panic recovery - converts handler panics into the 500 error shape
        .layer(CatchPanicLayer::custom(handle_panic))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
