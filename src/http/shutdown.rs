//! Graceful shutdown and signal handling.
//!
//! On SIGTERM the server handle is told to stop accepting connections and
//! to wait for in-flight ones, optionally bounded by a timeout.

use std::future::Future;
use std::time::Duration;

use axum_server::Handle;
use tokio::task::JoinHandle;

use super::ServerError;

/// Install the SIGTERM handler and arm graceful shutdown on `handle`.
///
/// The signal is registered before returning so a SIGTERM delivered while
/// the listener is still binding is not lost. On non-Unix platforms Ctrl+C
/// takes the place of SIGTERM.
pub fn setup_shutdown_handler(
    handle: Handle,
    timeout: Option<Duration>,
) -> Result<JoinHandle<()>, ServerError> {
    #[cfg(unix)]
    let terminate = {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .map_err(ServerError::Signal)?;
        async move {
            sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C, shutdown signal disabled");
            std::future::pending::<()>().await;
        }
    };

    Ok(spawn_shutdown_on(terminate, handle, timeout))
}

/// Trigger graceful shutdown on `handle` once `signal` resolves.
///
/// When the signal fires the server will:
/// 1. Stop accepting new connections
/// 2. Wait for existing connections to complete, at most `timeout` if set
/// 3. Return from `serve`
pub fn spawn_shutdown_on<F>(signal: F, handle: Handle, timeout: Option<Duration>) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        signal.await;
        tracing::info!("SIGTERM signal received: closing HTTP server");

        match timeout {
            Some(timeout) => tracing::info!(
                timeout_secs = timeout.as_secs(),
                connections = handle.connection_count(),
                "Graceful shutdown initiated, waiting for connections to close"
            ),
            None => tracing::info!(
                connections = handle.connection_count(),
                "Graceful shutdown initiated, waiting for all connections to close without a deadline"
            ),
        }
        handle.graceful_shutdown(timeout);
    })
}
