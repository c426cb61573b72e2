//! Telemetry snapshot endpoint.
//!
//! Each request reads process memory, load average, memory totals and uptime
//! fresh from the probe. A failing read surfaces as a 500.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;
use crate::telemetry::{ProcessMemory, SystemStats};

#[derive(Debug, Clone, Serialize)]
pub struct MetricsResponse {
    pub process_memory_usage: ProcessMemory,
    pub system: SystemStats,
    /// Seconds since `AppState` was built in `main`. This trails the OS
    /// process age by the time spent loading config and installing tracing
    /// before the state exists.
    pub uptime: f64,
}

pub async fn metrics(State(state): State<AppState>) -> Result<Json<MetricsResponse>, AppError> {
    let process_memory_usage = state.probe.process_memory()?;
    let system = state.probe.system_stats()?;

    Ok(Json(MetricsResponse {
        process_memory_usage,
        system,
        uptime: state.uptime().as_secs_f64(),
    }))
}
