//! hello-eks: a minimal HTTP service for container orchestrators.
//!
//! Serves a health probe, a telemetry snapshot and a greeting that echoes
//! request headers, and drains in-flight requests on SIGTERM.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::{AppConfig, AppInfo};
pub use error::{AppError, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
