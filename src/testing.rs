//! Test doubles for code that embeds the monitor
//!
//! # Usage
//!
//! ```
//! use performance_monitor::testing::{FixedProbe, RecordingLog};
//! use performance_monitor::{MonitorConfig, PerformanceMonitor};
//!
//! let probe = FixedProbe::new(6.2, 0, "");
//! let log = RecordingLog::new();
//! let config = MonitorConfig {
//!     execution_time_max_seconds: 5.0,
//!     ..Default::default()
//! };
//! let monitor = PerformanceMonitor::new(config, 0.0, probe, &log);
//!
//! monitor.execute();
//! assert_eq!(log.messages().len(), 1);
//! ```

use crate::{LogEvent, LogHandler, LogLevel, ProcessProbe};
use std::sync::Mutex;

/// Probe returning synthetic readings; the clock can be advanced
#[derive(Debug)]
pub struct FixedProbe {
    now: Mutex<f64>,
    peak_memory_bytes: u64,
    memory_limit: String,
}

impl FixedProbe {
    pub fn new(now: f64, peak_memory_bytes: u64, memory_limit: impl Into<String>) -> Self {
        Self {
            now: Mutex::new(now),
            peak_memory_bytes,
            memory_limit: memory_limit.into(),
        }
    }

    /// Move the clock forward by `seconds`
    pub fn advance(&self, seconds: f64) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += seconds;
    }
}

impl ProcessProbe for FixedProbe {
    fn now(&self) -> f64 {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn peak_memory_bytes(&self) -> u64 {
        self.peak_memory_bytes
    }

    fn memory_limit(&self) -> String {
        self.memory_limit.clone()
    }
}

/// Log handler keeping every event in memory
#[derive(Debug, Default)]
pub struct RecordingLog {
    events: Mutex<Vec<LogEvent>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.message).collect()
    }
}

impl LogHandler for RecordingLog {
    fn handle_log(&self, level: LogLevel, message: String) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(LogEvent { level, message });
    }
}
