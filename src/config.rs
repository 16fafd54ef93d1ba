//! Monitor configuration
//!
//! Sources are merged in this order (later sources override earlier):
//! 1. Default values from `MonitorConfig::default()`
//! 2. JSON configuration file (if given and present)
//! 3. Environment variables with prefix (e.g., `PERFORMANCE_MONITOR_EXECUTION_TIME_MAX_SECONDS`)

use crate::error::{ConfigError, Result};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default environment variable prefix (without trailing underscore)
pub const DEFAULT_ENV_PREFIX: &str = "PERFORMANCE_MONITOR";

/// Threshold check configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Run the wall-clock check (default: true)
    pub enable_execution_time_check: bool,
    /// Run the peak memory check (default: true)
    pub enable_memory_limit_check: bool,
    /// Seconds since start before a warning is logged (default: 30s)
    pub execution_time_max_seconds: f64,
    /// Share of the memory limit, in percent, that triggers a warning (default: 80)
    pub memory_limit_max_memory_percent: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enable_execution_time_check: true,
            enable_memory_limit_check: true,
            execution_time_max_seconds: 30.0,
            memory_limit_max_memory_percent: 80.0,
        }
    }
}

impl MonitorConfig {
    /// Parse and validate a JSON document; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds that would make the comparisons meaningless
    pub fn validate(&self) -> Result<()> {
        check_threshold("execution_time_max_seconds", self.execution_time_max_seconds)?;
        check_threshold(
            "memory_limit_max_memory_percent",
            self.memory_limit_max_memory_percent,
        )?;
        Ok(())
    }
}

fn check_threshold(key: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        })
    }
}

/// Configuration loader
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// JSON configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Load configuration from all sources
    pub fn load(&self) -> Result<MonitorConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(MonitorConfig::default()));

        if let Some(path) = &self.config_path {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading monitor configuration file");
                figment = figment.merge(Json::file(path));
            } else {
                tracing::debug!(path = %path.display(), "monitor configuration file not found, skipping");
            }
        }

        // Keys are flat and contain underscores, so no nesting split
        figment = figment.merge(Env::prefixed(&format!("{}_", self.env_prefix)));

        let config: MonitorConfig = figment.extract()?;
        config.validate()?;

        tracing::debug!(
            execution_time = config.enable_execution_time_check,
            memory_limit = config.enable_memory_limit_check,
            max_seconds = config.execution_time_max_seconds,
            max_memory_percent = config.memory_limit_max_memory_percent,
            "monitor configuration loaded"
        );

        Ok(config)
    }
}
