//! Configuration loading and constants.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables (`PORT`, `APP_VERSION`, `ENVIRONMENT`, `HOST`,
//! `SHUTDOWN_TIMEOUT_SECS`, `LOG_FORMAT`). The result is loaded once at startup
//! and never mutated afterwards.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

// =============================================================================
// Defaults
// =============================================================================

/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listener port
pub const DEFAULT_PORT: u16 = 3000;

/// Default version reported in responses
pub const DEFAULT_APP_VERSION: &str = "1.0.0";

/// Default environment label reported in responses
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Upper bound on the connection drain after SIGTERM. Zero disables the bound.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "hello_eks=info,tower_http=info";

// =============================================================================
// Environment variable names
// =============================================================================

pub const ENV_PORT: &str = "PORT";
pub const ENV_HOST: &str = "HOST";
pub const ENV_APP_VERSION: &str = "APP_VERSION";
pub const ENV_ENVIRONMENT: &str = "ENVIRONMENT";
pub const ENV_SHUTDOWN_TIMEOUT: &str = "SHUTDOWN_TIMEOUT_SECS";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP listener configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Identity reported by the endpoints
    #[serde(default)]
    pub app: AppInfo,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    /// Seconds to wait for in-flight requests after SIGTERM (0 = wait forever)
    #[serde(default = "HttpServerConfig::default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_timeout_seconds: Self::default_shutdown_timeout(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_PORT
    }

    fn default_shutdown_timeout() -> u64 {
        DEFAULT_SHUTDOWN_TIMEOUT_SECS
    }

    /// `host:port` string the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Drain bound handed to the server handle; `None` means unbounded.
    pub fn shutdown_timeout(&self) -> Option<Duration> {
        match self.shutdown_timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Version and environment labels echoed by `/health` and `/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppInfo {
    #[serde(default = "AppInfo::default_version")]
    pub version: String,
    #[serde(default = "AppInfo::default_environment")]
    pub environment: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            environment: Self::default_environment(),
        }
    }
}

impl AppInfo {
    fn default_version() -> String {
        DEFAULT_APP_VERSION.to_string()
    }

    fn default_environment() -> String {
        DEFAULT_ENVIRONMENT.to_string()
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::Validation(format!(
                "Unknown log format '{}', expected 'text' or 'json'",
                other
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then apply the process
    /// environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply environment overrides using `lookup` to resolve variable names.
    ///
    /// Empty values count as unset, so `PORT=""` falls back to the file or
    /// built-in default rather than failing.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(port) = var(ENV_PORT) {
            self.http.port = port.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("{} must be a port number, got '{}'", ENV_PORT, port))
            })?;
        }
        if let Some(host) = var(ENV_HOST) {
            self.http.host = host;
        }
        if let Some(secs) = var(ENV_SHUTDOWN_TIMEOUT) {
            self.http.shutdown_timeout_seconds = secs.trim().parse().map_err(|_| {
                ConfigError::Validation(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_SHUTDOWN_TIMEOUT, secs
                ))
            })?;
        }
        if let Some(version) = var(ENV_APP_VERSION) {
            self.app.version = version;
        }
        if let Some(environment) = var(ENV_ENVIRONMENT) {
            self.app.environment = environment;
        }
        if let Some(format) = var(ENV_LOG_FORMAT) {
            self.logging.format = format.parse()?;
        }

        Ok(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
