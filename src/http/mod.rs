//! HTTP listener lifecycle.
//!
//! The server includes:
//! - Plain HTTP listener on the configured host and port
//! - Graceful shutdown on SIGTERM with a bounded connection drain

mod server;
mod shutdown;

pub use server::{serve, start_server, ServerError};
pub use shutdown::{setup_shutdown_handler, spawn_shutdown_on};
