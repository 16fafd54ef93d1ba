//! Threshold decisions
//!
//! Pure functions: they take readings and thresholds and return a
//! [`Warning`] when a threshold is breached. Logging is left to the caller.

use crate::Warning;
use crate::size::parse_byte_size_string;

/// Check wall-clock time elapsed between `process_start` and `now`
///
/// Both timestamps are fractional seconds since the Unix epoch. Fires only
/// when the elapsed time is strictly greater than `max_seconds`.
pub fn check_execution_time(process_start: f64, now: f64, max_seconds: f64) -> Option<Warning> {
    let elapsed = now - process_start;
    if elapsed > max_seconds {
        Some(Warning::ExecutionTime {
            elapsed_seconds: elapsed as u64,
            max_seconds: max_seconds as u64,
        })
    } else {
        None
    }
}

/// Check peak memory against `max_percent` of the memory limit
///
/// An empty limit means no limit is configured and the check is skipped. A
/// limit that parses to zero bytes (`"-1"`, garbage) is treated as no breach.
pub fn check_memory_threshold(
    peak_bytes: u64,
    memory_limit: &str,
    max_percent: f64,
) -> Option<Warning> {
    if memory_limit.trim().is_empty() {
        return None;
    }

    let limit_bytes = parse_byte_size_string(memory_limit);
    if limit_bytes == 0 {
        return None;
    }

    let usage_percent = (peak_bytes as f64 / limit_bytes as f64) * 100.0;
    if usage_percent >= max_percent {
        Some(Warning::MemoryUsage {
            used_bytes: peak_bytes,
            threshold_bytes: (limit_bytes as f64 * max_percent / 100.0) as u64,
            usage_percent: usage_percent as u64,
        })
    } else {
        None
    }
}
