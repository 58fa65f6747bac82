use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid max_concurrent_suites: {0}. Must be between 1 and 32")]
    InvalidConcurrency(usize),

    #[error("Invalid suite_timeout_secs: {0}. Must be positive")]
    InvalidSuiteTimeout(u64),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be <= max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid retention: {0} days. Must be positive")]
    InvalidRetention(i64),

    #[error("Invalid fairness thresholds: warn {0} must be <= fail {1}")]
    InvalidFairnessThresholds(f64, f64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. .vigil/config.yaml (project config, created by init)
    /// 3. .vigil/local.yaml (local overrides, optional)
    /// 4. Environment variables (VIGIL_* prefix)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".vigil/config.yaml"))
            .merge(Yaml::file(".vigil/local.yaml"))
            .merge(Env::prefixed("VIGIL_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let concurrency = config.orchestrator.max_concurrent_suites;
        if concurrency == 0 || concurrency > 32 {
            return Err(ConfigError::InvalidConcurrency(concurrency));
        }
        if config.orchestrator.suite_timeout_secs == 0 {
            return Err(ConfigError::InvalidSuiteTimeout(
                config.orchestrator.suite_timeout_secs,
            ));
        }

        if config.judge.initial_backoff_ms > config.judge.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.judge.initial_backoff_ms,
                config.judge.max_backoff_ms,
            ));
        }

        if config.retention.test_results_days <= 0 {
            return Err(ConfigError::InvalidRetention(
                config.retention.test_results_days,
            ));
        }
        if config.retention.resolved_alerts_days <= 0 {
            return Err(ConfigError::InvalidRetention(
                config.retention.resolved_alerts_days,
            ));
        }

        let fairness = &config.suites.fairness;
        if fairness.warn_threshold > fairness.fail_threshold {
            return Err(ConfigError::InvalidFairnessThresholds(
                fairness.warn_threshold,
                fairness.fail_threshold,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn empty_database_path_rejected() {
        let mut config = Config::default();
        config.database.path = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyDatabasePath)
        ));
    }

    #[test]
    fn inverted_fairness_thresholds_rejected() {
        let mut config = Config::default();
        config.suites.fairness.warn_threshold = 0.2;
        config.suites.fairness.fail_threshold = 0.1;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidFairnessThresholds(_, _))
        ));
    }

    #[test]
    fn zero_concurrency_rejected() {
        let mut config = Config::default();
        config.orchestrator.max_concurrent_suites = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidConcurrency(0))
        ));
    }
}
