//! Shared application state for request handlers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::AppInfo;
use crate::telemetry::{SysinfoProbe, SystemProbe};

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Everything here is fixed at startup: the version/environment labels, the
/// telemetry probe, and the instant the process began serving.
#[derive(Clone)]
pub struct AppState {
    pub info: Arc<AppInfo>,
    pub probe: Arc<dyn SystemProbe>,
    pub started_at: Instant,
}

impl AppState {
    /// Creates state backed by the host operating system probe.
    pub fn new(info: AppInfo) -> Self {
        Self::with_probe(info, Arc::new(SysinfoProbe::new()))
    }

    pub fn with_probe(info: AppInfo, probe: Arc<dyn SystemProbe>) -> Self {
        Self {
            info: Arc::new(info),
            probe,
            started_at: Instant::now(),
        }
    }

    /// Time since this state was built, not since the process was exec'd.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
