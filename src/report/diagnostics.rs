//! Process memory and wall-clock diagnostics

use std::fmt;
use std::time::{Duration, Instant};

use sysinfo::{Pid, System};

/// Tracks elapsed time since creation and samples resident memory
pub struct ResourceMonitor {
    start: Instant,
    system: System,
    pid: Option<Pid>,
}

impl ResourceMonitor {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            system: System::new(),
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    /// Time since the monitor was created
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Resident set size of this process in MB, if the OS reports it
    pub fn rss_mb(&mut self) -> Option<f64> {
        let pid = self.pid?;
        if !self.system.refresh_process(pid) {
            return None;
        }
        self.system
            .process(pid)
            .map(|process| process.memory() as f64 / (1024.0 * 1024.0))
    }

    /// Formatted RSS for progress lines
    pub fn rss_display(&mut self) -> MemoryDisplay {
        MemoryDisplay(self.rss_mb())
    }
}

impl Default for ResourceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// `12.34 MB`, or `unavailable`
pub struct MemoryDisplay(Option<f64>);

impl fmt::Display for MemoryDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(mb) => write!(f, "{:.2} MB", mb),
            None => write!(f, "unavailable"),
        }
    }
}
