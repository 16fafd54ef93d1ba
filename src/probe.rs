//! Platform queries used by the monitor
//!
//! All queries are read-only. Failures degrade to "nothing to report": peak
//! memory falls back to 0 and the memory limit to an empty string.

use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// cgroup v2 memory limit of the current cgroup namespace
const CGROUP_MEMORY_MAX: &str = "/sys/fs/cgroup/memory.max";

/// Source of the readings compared against thresholds
pub trait ProcessProbe: Send + Sync {
    /// Current time in fractional seconds since the Unix epoch
    fn now(&self) -> f64;

    /// Highest memory use of this process so far, in bytes
    fn peak_memory_bytes(&self) -> u64;

    /// Memory limit as a size string (`"512M"`, `"1073741824"`), empty if unlimited
    fn memory_limit(&self) -> String;
}

impl<T: ProcessProbe + ?Sized> ProcessProbe for &T {
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn peak_memory_bytes(&self) -> u64 {
        (**self).peak_memory_bytes()
    }

    fn memory_limit(&self) -> String {
        (**self).memory_limit()
    }
}

impl<T: ProcessProbe + ?Sized> ProcessProbe for std::sync::Arc<T> {
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn peak_memory_bytes(&self) -> u64 {
        (**self).peak_memory_bytes()
    }

    fn memory_limit(&self) -> String {
        (**self).memory_limit()
    }
}

/// Probe backed by the host operating system
#[derive(Debug, Clone)]
pub struct SystemProbe {
    memory_limit: Option<String>,
    cgroup_memory_max: PathBuf,
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbe {
    pub fn new() -> Self {
        Self {
            memory_limit: None,
            cgroup_memory_max: PathBuf::from(CGROUP_MEMORY_MAX),
        }
    }

    /// Use a fixed memory limit string instead of the cgroup limit
    pub fn with_memory_limit(mut self, limit: impl Into<String>) -> Self {
        self.memory_limit = Some(limit.into());
        self
    }

    /// Read the cgroup limit from another `memory.max` file
    pub fn with_cgroup_memory_max(mut self, path: impl Into<PathBuf>) -> Self {
        self.cgroup_memory_max = path.into();
        self
    }

    fn cgroup_memory_limit(&self) -> String {
        match std::fs::read_to_string(&self.cgroup_memory_max) {
            Ok(raw) => normalize_cgroup_limit(&raw),
            Err(err) => {
                tracing::trace!(
                    path = %self.cgroup_memory_max.display(),
                    error = %err,
                    "cgroup memory limit unavailable"
                );
                String::new()
            }
        }
    }
}

impl ProcessProbe for SystemProbe {
    fn now(&self) -> f64 {
        unix_now()
    }

    fn peak_memory_bytes(&self) -> u64 {
        read_peak_rss_bytes()
            .or_else(current_process_memory)
            .unwrap_or(0)
    }

    fn memory_limit(&self) -> String {
        match &self.memory_limit {
            Some(limit) => limit.clone(),
            None => self.cgroup_memory_limit(),
        }
    }
}

/// `memory.max` holds either a byte count or `max` for no limit
fn normalize_cgroup_limit(raw: &str) -> String {
    let value = raw.trim();
    if value == "max" {
        String::new()
    } else {
        value.to_string()
    }
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Peak resident set size (`VmHWM`) from `/proc/self/status`
#[cfg(target_os = "linux")]
fn read_peak_rss_bytes() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_vm_hwm(&status)
}

#[cfg(not(target_os = "linux"))]
fn read_peak_rss_bytes() -> Option<u64> {
    None
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_vm_hwm(status: &str) -> Option<u64> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("VmHWM:"))
        .and_then(|value| value.split_whitespace().next())
        .and_then(|raw| raw.parse::<u64>().ok())
        .map(|kb| kb.saturating_mul(1024))
}

/// Current resident memory of this process (cross-platform using sysinfo)
fn current_process_memory() -> Option<u64> {
    let pid = Pid::from_u32(std::process::id());
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::nothing().with_memory(),
    );
    system.process(pid).map(|process| process.memory())
}

/// Start time of the current process in seconds since the Unix epoch
///
/// On Linux this is derived from the `starttime` field of `/proc/self/stat`
/// and `/proc/uptime`, so it is accurate to one clock tick (usually 10ms).
/// Elsewhere, or if procfs is unreadable, it is the time of the first call.
pub fn process_start_time() -> f64 {
    static FIRST_CALL: OnceLock<f64> = OnceLock::new();

    read_proc_start_time().unwrap_or_else(|| *FIRST_CALL.get_or_init(unix_now))
}

#[cfg(target_os = "linux")]
fn read_proc_start_time() -> Option<f64> {
    use nix::unistd::{SysconfVar, sysconf};

    let ticks_per_second = sysconf(SysconfVar::CLK_TCK).ok().flatten()?;
    let stat = std::fs::read_to_string("/proc/self/stat").ok()?;
    let uptime = std::fs::read_to_string("/proc/uptime").ok()?;
    let now = unix_now();

    start_from_uptime(
        now,
        parse_uptime(&uptime)?,
        parse_start_ticks(&stat)?,
        u64::try_from(ticks_per_second).ok()?,
    )
}

#[cfg(not(target_os = "linux"))]
fn read_proc_start_time() -> Option<f64> {
    None
}

/// `starttime` (field 22) of `/proc/<pid>/stat`, in clock ticks since boot
///
/// The command name may contain spaces and parentheses, so fields are counted
/// from the last `)`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_start_ticks(stat: &str) -> Option<u64> {
    let (_, rest) = stat.rsplit_once(')')?;
    // rest starts at field 3 (state)
    rest.split_whitespace().nth(19)?.parse().ok()
}

/// Seconds since boot, the first value of `/proc/uptime`
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_uptime(uptime: &str) -> Option<f64> {
    uptime.split_whitespace().next()?.parse().ok()
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn start_from_uptime(now: f64, uptime: f64, start_ticks: u64, ticks_per_second: u64) -> Option<f64> {
    if ticks_per_second == 0 {
        return None;
    }
    let started_after_boot = start_ticks as f64 / ticks_per_second as f64;
    let elapsed = (uptime - started_after_boot).max(0.0);
    Some(now - elapsed)
}
