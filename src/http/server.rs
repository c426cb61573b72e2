//! HTTP server startup logic.

use std::net::SocketAddr;

use axum::Router;
use axum_server::Handle;

use crate::config::HttpServerConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address '{0}': {1}")]
    Address(String, std::net::AddrParseError),

    #[error("Failed to install signal handler: {0}")]
    Signal(std::io::Error),

    #[error("Failed to bind server: {0}")]
    Bind(std::io::Error),

    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

/// Start the HTTP server and run until a graceful shutdown completes.
///
/// Bind failures are returned immediately; there is no retry.
pub async fn start_server(app: Router, config: &HttpServerConfig) -> Result<(), ServerError> {
    let bind = config.bind_address();
    let addr: SocketAddr = bind
        .parse()
        .map_err(|e| ServerError::Address(bind.clone(), e))?;

    let handle = Handle::new();
    shutdown::setup_shutdown_handler(handle.clone(), config.shutdown_timeout())?;

    let listening = handle.clone();
    tokio::spawn(async move {
        if let Some(addr) = listening.listening().await {
            tracing::info!(%addr, port = addr.port(), "Server running");
        }
    });

    serve(app, addr, handle).await?;
    tracing::info!("HTTP server closed");

    Ok(())
}

/// Serve `app` on `addr` until `handle` is shut down.
///
/// The listener is bound up front so a bind failure is reported as
/// `ServerError::Bind` and anything after it as `ServerError::Serve`.
pub async fn serve(app: Router, addr: SocketAddr, handle: Handle) -> Result<(), ServerError> {
    tracing::debug!(%addr, "Binding HTTP listener");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .and_then(|listener| listener.into_std())
        .map_err(ServerError::Bind)?;

    axum_server::from_tcp(listener)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(ServerError::Serve)
}
