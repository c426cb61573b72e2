//! Process and OS telemetry.
//!
//! Every call performs a fresh read through `sysinfo`; nothing is cached or
//! sampled in the background. `SystemProbe` is the seam handlers depend on so
//! the router can run against a substitute probe.

use serde::Serialize;
use sysinfo::{Pid, System};

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Failed to resolve current process id: {0}")]
    CurrentPid(&'static str),

    #[error("Process {0} not found in process table")]
    ProcessNotFound(Pid),

    #[error("Host name unavailable")]
    HostnameUnavailable,

    #[error("System query failed: {0}")]
    Query(String),
}

/// Memory counters of the running process, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessMemory {
    /// Resident set size
    pub rss: u64,
    pub virtual_memory: u64,
}

/// OS-wide counters. `loadavg` is the 1, 5 and 15 minute load average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStats {
    pub loadavg: [f64; 3],
    pub freemem: u64,
    pub totalmem: u64,
}

/// Source of the telemetry exposed over HTTP.
pub trait SystemProbe: Send + Sync {
    fn process_memory(&self) -> Result<ProcessMemory, TelemetryError>;

    fn system_stats(&self) -> Result<SystemStats, TelemetryError>;

    fn hostname(&self) -> Result<String, TelemetryError>;
}

/// Probe backed by the host operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoProbe;

impl SysinfoProbe {
    pub fn new() -> Self {
        Self
    }
}

impl SystemProbe for SysinfoProbe {
    fn process_memory(&self) -> Result<ProcessMemory, TelemetryError> {
        let pid = sysinfo::get_current_pid().map_err(TelemetryError::CurrentPid)?;
        let mut sys = System::new();
        if !sys.refresh_process(pid) {
            return Err(TelemetryError::ProcessNotFound(pid));
        }
        let process = sys.process(pid).ok_or(TelemetryError::ProcessNotFound(pid))?;

        Ok(ProcessMemory {
            rss: process.memory(),
            virtual_memory: process.virtual_memory(),
        })
    }

    fn system_stats(&self) -> Result<SystemStats, TelemetryError> {
        let mut sys = System::new();
        sys.refresh_memory();

        let totalmem = sys.total_memory();
        if totalmem == 0 {
            return Err(TelemetryError::Query(
                "total memory reported as zero".to_string(),
            ));
        }
        let load = System::load_average();

        Ok(SystemStats {
            loadavg: [load.one, load.five, load.fifteen],
            // Available (not strictly free) memory, never above the total.
            freemem: sys.available_memory().min(totalmem),
            totalmem,
        })
    }

    fn hostname(&self) -> Result<String, TelemetryError> {
        System::host_name()
            .filter(|name| !name.is_empty())
            .ok_or(TelemetryError::HostnameUnavailable)
    }
}
