use serde::{Deserialize, Serialize};

/// A threshold breach detected by one of the checks
///
/// `Display` renders the message handed to the log handler. All numbers are
/// already truncated to integers for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    /// Wall-clock time since start exceeded the configured maximum
    ExecutionTime {
        elapsed_seconds: u64,
        max_seconds: u64,
    },

    /// Peak memory reached the configured share of the memory limit
    MemoryUsage {
        /// Peak memory in bytes
        used_bytes: u64,
        /// Configured percentage of the limit, in bytes
        threshold_bytes: u64,
        /// Actual usage as a percentage of the limit
        usage_percent: u64,
    },
}

/// Which check produced a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    ExecutionTime,
    MemoryUsage,
}

impl Warning {
    /// Which check produced this warning
    pub fn kind(&self) -> WarningKind {
        match self {
            Self::ExecutionTime { .. } => WarningKind::ExecutionTime,
            Self::MemoryUsage { .. } => WarningKind::MemoryUsage,
        }
    }

    /// Serialize to a JSON value for structured sinks
    pub fn to_json(&self) -> serde_json::Value {
        // A plain enum of integers always serializes
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExecutionTime {
                elapsed_seconds,
                max_seconds,
            } => write!(
                f,
                "Long-running process detected. Script run time: {} seconds. Execution Warning Time Limit: {} seconds",
                elapsed_seconds, max_seconds
            ),
            Self::MemoryUsage {
                used_bytes,
                threshold_bytes,
                usage_percent,
            } => write!(
                f,
                "Memory usage spike detected. Used memory: {} bytes. Memory Warning Limit: {} bytes ({}% of available memory)",
                used_bytes, threshold_bytes, usage_percent
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_message() {
        let warning = Warning::MemoryUsage {
            used_bytes: 900_000_000,
            threshold_bytes: 858_993_459,
            usage_percent: 83,
        };
        assert_eq!(
            warning.to_string(),
            "Memory usage spike detected. Used memory: 900000000 bytes. Memory Warning Limit: 858993459 bytes (83% of available memory)"
        );
        assert_eq!(warning.kind(), WarningKind::MemoryUsage);
    }

    #[test]
    fn test_json_shape() {
        let warning = Warning::ExecutionTime {
            elapsed_seconds: 6,
            max_seconds: 5,
        };
        assert_eq!(
            warning.to_json(),
            serde_json::json!({
                "type": "execution_time",
                "elapsed_seconds": 6,
                "max_seconds": 5,
            })
        );
    }
}
