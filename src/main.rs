//! hello-eks entry point.
//!
//! Initializes tracing, loads configuration from the environment (and an
//! optional TOML file), builds the Axum router and serves it until SIGTERM.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hello_eks::config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER};
use hello_eks::{create_router, http, AppState};

/// hello-eks: health, metrics and greeting endpoints
#[derive(Parser, Debug)]
#[command(name = "hello-eks", version, about)]
struct Args {
    /// Optional TOML configuration file; environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "hello_eks=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration first: the log format lives in it
    let config = AppConfig::load(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    match config.logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!(
        port = config.http.port,
        environment = %config.app.environment,
        version = %config.app.version,
        "Loaded configuration"
    );

    let state = AppState::new(config.app.clone());
    let app = create_router(state);

    if let Err(e) = http::start_server(app, &config.http).await {
        tracing::error!(error = %e, "Server failed");
        return Err(e.into());
    }

    Ok(())
}
