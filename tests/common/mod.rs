use performance_monitor::{LogEvent, LogSender, ProcessProbe};
use std::sync::Mutex;
use std::sync::mpsc::{Receiver, channel};

/// Synthetic clock and memory readings
pub struct ManualProbe {
    now: Mutex<f64>,
    peak_memory_bytes: u64,
    memory_limit: String,
}

impl ManualProbe {
    pub fn new(now: f64, peak_memory_bytes: u64, memory_limit: &str) -> Self {
        Self {
            now: Mutex::new(now),
            peak_memory_bytes,
            memory_limit: memory_limit.to_string(),
        }
    }

    pub fn advance(&self, seconds: f64) {
        *self.now.lock().unwrap() += seconds;
    }
}

impl ProcessProbe for ManualProbe {
    fn now(&self) -> f64 {
        *self.now.lock().unwrap()
    }

    fn peak_memory_bytes(&self) -> u64 {
        self.peak_memory_bytes
    }

    fn memory_limit(&self) -> String {
        self.memory_limit.clone()
    }
}

pub fn log_channel() -> (LogSender, Receiver<LogEvent>) {
    channel()
}

pub fn drain(rx: &Receiver<LogEvent>) -> Vec<LogEvent> {
    rx.try_iter().collect()
}

pub fn messages(rx: &Receiver<LogEvent>) -> Vec<String> {
    drain(rx).into_iter().map(|e| e.message).collect()
}
