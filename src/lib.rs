//! Runtime self-check for long-running or memory-hungry work
//!
//! This crate compares elapsed wall-clock time and peak memory usage against
//! configured thresholds and reports breaches to a log handler. It is meant
//! to be invoked once per request or process by a framework hook.

mod checker;
mod config;
mod error;
mod log;
mod monitor;
mod probe;
mod size;
mod warning;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use checker::{check_execution_time, check_memory_threshold};
pub use config::{ConfigLoader, DEFAULT_ENV_PREFIX, MonitorConfig};
pub use error::{ConfigError, Result};
pub use log::{DefaultLog, LogEvent, LogHandle, LogHandler, LogLevel, LogSender, TracingLog};
pub use monitor::{PerformanceMonitor, RequestGuard};
pub use probe::{ProcessProbe, SystemProbe, process_start_time};
pub use size::parse_byte_size_string;
pub use warning::{Warning, WarningKind};
