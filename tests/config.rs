use figment::Jail;
use performance_monitor::{ConfigError, ConfigLoader, MonitorConfig};

#[test]
fn test_defaults_without_sources() {
    Jail::expect_with(|_jail| {
        let config = ConfigLoader::new()
            .with_config_path("missing.json")
            .load()
            .expect("defaults should load");
        assert_eq!(config, MonitorConfig::default());
        Ok(())
    });
}

#[test]
fn test_file_then_env_override() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "monitor.json",
            r#"{
                "enable_memory_limit_check": false,
                "execution_time_max_seconds": 5,
                "memory_limit_max_memory_percent": 90
            }"#,
        )?;
        jail.set_env("PERFORMANCE_MONITOR_EXECUTION_TIME_MAX_SECONDS", 12);

        let config = ConfigLoader::new()
            .with_config_path("monitor.json")
            .load()
            .expect("config should load");

        assert!(config.enable_execution_time_check);
        assert!(!config.enable_memory_limit_check);
        assert_eq!(config.execution_time_max_seconds, 12.0);
        assert_eq!(config.memory_limit_max_memory_percent, 90.0);
        Ok(())
    });
}

#[test]
fn test_custom_env_prefix() {
    Jail::expect_with(|jail| {
        jail.set_env("APP_MONITOR_ENABLE_EXECUTION_TIME_CHECK", "false");
        jail.set_env("PERFORMANCE_MONITOR_ENABLE_EXECUTION_TIME_CHECK", "true");

        let config = ConfigLoader::new()
            .with_env_prefix("APP_MONITOR")
            .load()
            .expect("config should load");
        assert!(!config.enable_execution_time_check);
        Ok(())
    });
}

#[test]
fn test_invalid_threshold_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("PERFORMANCE_MONITOR_MEMORY_LIMIT_MAX_MEMORY_PERCENT", -5);

        let err = ConfigLoader::new().load().expect_err("negative percent");
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "memory_limit_max_memory_percent",
                ..
            }
        ));
        Ok(())
    });
}

#[test]
fn test_wrong_type_is_load_error() {
    Jail::expect_with(|jail| {
        jail.set_env("PERFORMANCE_MONITOR_ENABLE_MEMORY_LIMIT_CHECK", "sometimes");

        let err = ConfigLoader::new().load().expect_err("not a bool");
        assert!(matches!(err, ConfigError::Load(_)));
        Ok(())
    });
}
