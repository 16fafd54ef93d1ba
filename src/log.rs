use crate::Warning;
use std::sync::Arc;

/// Log event emitted by the monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
}

/// Log level handed to the log handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Log,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse log level from string
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" | "warning" => LogLevel::Warn,
            "info" => LogLevel::Info,
            "log" => LogLevel::Log,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Log => write!(f, "LOG"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Trace => write!(f, "TRACE"),
        }
    }
}

/// Type alias for log event sender
pub type LogSender = std::sync::mpsc::Sender<LogEvent>;

/// Receives the messages produced by the monitor
///
/// Logging is fire-and-forget: implementations must not panic and have no
/// way to report failure back to the monitor.
pub trait LogHandler: Send + Sync {
    /// Handle a log message
    ///
    /// Default: prints to stderr
    fn handle_log(&self, level: LogLevel, message: String) {
        eprintln!("[{}] {}", level, message);
    }

    /// Handle a threshold breach
    ///
    /// Default: logs the rendered message at error level. Override to keep
    /// the numbers as structured data.
    fn handle_warning(&self, warning: &Warning) {
        self.handle_log(LogLevel::Error, warning.to_string());
    }
}

/// Stderr handler using the default trait method
pub struct DefaultLog;

impl LogHandler for DefaultLog {}

/// Forwards messages to the `tracing` subscriber installed by the host
pub struct TracingLog;

impl LogHandler for TracingLog {
    fn handle_log(&self, level: LogLevel, message: String) {
        // `Log` has no tracing counterpart and goes out as INFO
        match level {
            LogLevel::Error => tracing::error!(target: "performance_monitor", "{}", message),
            LogLevel::Warn => tracing::warn!(target: "performance_monitor", "{}", message),
            LogLevel::Info | LogLevel::Log => {
                tracing::info!(target: "performance_monitor", "{}", message)
            }
            LogLevel::Debug => tracing::debug!(target: "performance_monitor", "{}", message),
            LogLevel::Trace => tracing::trace!(target: "performance_monitor", "{}", message),
        }
    }

    fn handle_warning(&self, warning: &Warning) {
        tracing::error!(
            target: "performance_monitor",
            kind = ?warning.kind(),
            details = %warning.to_json(),
            "{}",
            warning
        );
    }
}

impl LogHandler for LogSender {
    fn handle_log(&self, level: LogLevel, message: String) {
        // Receiver gone means nobody is listening anymore
        let _ = self.send(LogEvent { level, message });
    }
}

impl LogHandler for tokio::sync::mpsc::UnboundedSender<LogEvent> {
    fn handle_log(&self, level: LogLevel, message: String) {
        let _ = self.send(LogEvent { level, message });
    }
}

impl<T: LogHandler + ?Sized> LogHandler for Arc<T> {
    fn handle_log(&self, level: LogLevel, message: String) {
        (**self).handle_log(level, message)
    }

    fn handle_warning(&self, warning: &Warning) {
        (**self).handle_warning(warning)
    }
}

impl<T: LogHandler + ?Sized> LogHandler for &T {
    fn handle_log(&self, level: LogLevel, message: String) {
        (**self).handle_log(level, message)
    }

    fn handle_warning(&self, warning: &Warning) {
        (**self).handle_warning(warning)
    }
}

/// Arc wrapper for LogHandler trait object
pub type LogHandle = Arc<dyn LogHandler>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing() {
        assert_eq!(LogLevel::from_str("ERROR"), LogLevel::Error);
        assert_eq!(LogLevel::from_str("warning"), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("nonsense"), LogLevel::Info);
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_std_sender() {
        let (tx, rx) = std::sync::mpsc::channel();
        tx.handle_log(LogLevel::Error, "boom".to_string());
        let event = rx.recv().expect("event should be sent");
        assert_eq!(event.level, LogLevel::Error);
        assert_eq!(event.message, "boom");

        // Closed channel is ignored
        drop(rx);
        tx.handle_log(LogLevel::Error, "lost".to_string());
    }

    #[test]
    fn test_warning_defaults_to_error_message() {
        let (tx, rx) = std::sync::mpsc::channel();
        let warning = Warning::ExecutionTime {
            elapsed_seconds: 6,
            max_seconds: 5,
        };
        tx.handle_warning(&warning);
        let event = rx.recv().expect("event should be sent");
        assert_eq!(event.level, LogLevel::Error);
        assert_eq!(event.message, warning.to_string());
    }

    #[tokio::test]
    async fn test_tokio_sender() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let handle: LogHandle = Arc::new(tx);
        handle.handle_log(LogLevel::Warn, "slow".to_string());
        let event = rx.recv().await.expect("event should be sent");
        assert_eq!(
            event,
            LogEvent {
                level: LogLevel::Warn,
                message: "slow".to_string()
            }
        );
    }
}
