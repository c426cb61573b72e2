//! Health check endpoint for container orchestration.
//!
//! Liveness/readiness probe: returns 200 with the configured version and
//! environment whenever the process can answer HTTP. Performs no I/O.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::state::AppState;

pub const HEALTHY: &str = "healthy";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub environment: String,
}

/// Health check handler.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HEALTHY.to_string(),
        timestamp: timestamp(),
        version: state.info.version.clone(),
        environment: state.info.environment.clone(),
    })
}
