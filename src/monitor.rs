use crate::checker::{check_execution_time, check_memory_threshold};
use crate::{LogHandler, MonitorConfig, ProcessProbe, Warning};

/// Runs the configured threshold checks and reports breaches
///
/// The start timestamp, configuration, probe and log handler are all supplied
/// at construction. Nothing is mutated by [`execute`](Self::execute), so one
/// monitor can be shared between request threads.
pub struct PerformanceMonitor<P, L> {
    config: MonitorConfig,
    process_start: f64,
    probe: P,
    log: L,
}

impl<P: ProcessProbe, L: LogHandler> PerformanceMonitor<P, L> {
    /// Create a monitor measuring elapsed time from `process_start`
    /// (seconds since the Unix epoch)
    pub fn new(config: MonitorConfig, process_start: f64, probe: P, log: L) -> Self {
        Self {
            config,
            process_start,
            probe,
            log,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn process_start(&self) -> f64 {
        self.process_start
    }

    /// Execute the enabled checks against the process start time
    ///
    /// Every warning is sent to the log handler at error level and also
    /// returned.
    pub fn execute(&self) -> Vec<Warning> {
        self.execute_since(self.process_start)
    }

    /// Execute the enabled checks, measuring elapsed time from `start`
    pub fn execute_since(&self, start: f64) -> Vec<Warning> {
        let mut warnings = Vec::new();

        if self.config.enable_execution_time_check {
            warnings.extend(self.execution_time_warning(start));
        }

        if self.config.enable_memory_limit_check {
            warnings.extend(self.memory_warning());
        }

        for warning in &warnings {
            self.log.handle_warning(warning);
        }

        warnings
    }

    /// Start tracking a unit of work; the checks run when the guard drops
    pub fn track(&self) -> RequestGuard<'_, P, L> {
        RequestGuard {
            monitor: self,
            start: self.probe.now(),
            finished: false,
        }
    }

    fn execution_time_warning(&self, start: f64) -> Option<Warning> {
        let now = self.probe.now();
        tracing::debug!(
            elapsed = now - start,
            max_seconds = self.config.execution_time_max_seconds,
            "execution time check"
        );
        check_execution_time(start, now, self.config.execution_time_max_seconds)
    }

    fn memory_warning(&self) -> Option<Warning> {
        let limit = self.probe.memory_limit();
        if limit.trim().is_empty() {
            tracing::debug!("no memory limit configured, skipping memory check");
            return None;
        }

        let peak_bytes = self.probe.peak_memory_bytes();
        tracing::debug!(
            peak_bytes,
            limit = %limit,
            max_percent = self.config.memory_limit_max_memory_percent,
            "memory check"
        );
        check_memory_threshold(
            peak_bytes,
            &limit,
            self.config.memory_limit_max_memory_percent,
        )
    }
}

/// Runs the monitor for one request when dropped
///
/// Elapsed time is measured from the moment [`PerformanceMonitor::track`]
/// was called rather than from process start.
pub struct RequestGuard<'a, P: ProcessProbe, L: LogHandler> {
    monitor: &'a PerformanceMonitor<P, L>,
    start: f64,
    finished: bool,
}

impl<P: ProcessProbe, L: LogHandler> RequestGuard<'_, P, L> {
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Run the checks now and return the warnings instead of waiting for drop
    pub fn finish(mut self) -> Vec<Warning> {
        self.finished = true;
        self.monitor.execute_since(self.start)
    }
}

impl<P: ProcessProbe, L: LogHandler> Drop for RequestGuard<'_, P, L> {
    fn drop(&mut self) {
        if !self.finished {
            self.monitor.execute_since(self.start);
        }
    }
}
