//! CLI configuration management
//!
//! Settings come from a TOML file, `VOLCTL_*` environment variables, and
//! command-line flags. Precedence: CLI > environment > file > defaults.
//!
//! ```toml
//! log_level = "debug"
//!
//! [estimator]
//! short_window = 20
//! long_window = 60
//! annualization_factor = 252.0
//!
//! [blend]
//! realized_short = 0.3
//! realized_long = 0.2
//! implied = 0.5
//!
//! [quality]
//! max_gap_days = 4
//! ```

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use vol_core::params::{BlendWeights, EstimatorConfig};
use vol_estimators::engine::VolatilityEngine;
use vol_estimators::quality::{QualityThresholds, QualityValidator};

/// Environment variable names.
pub const ENV_LOG_LEVEL: &str = "VOLCTL_LOG_LEVEL";
pub const ENV_SHORT_WINDOW: &str = "VOLCTL_SHORT_WINDOW";
pub const ENV_LONG_WINDOW: &str = "VOLCTL_LONG_WINDOW";
pub const ENV_ANNUALIZATION_FACTOR: &str = "VOLCTL_ANNUALIZATION_FACTOR";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),

    #[error(transparent)]
    Engine(#[from] vol_core::types::ConfigError),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Resolved `volctl` configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Log level
    pub log_level: LogLevel,
    /// Estimator windows and annualization
    pub estimator: EstimatorConfig,
    /// Blend weights
    pub blend: BlendWeights,
    /// Quality-report thresholds
    pub quality: QualityThresholds,
}

/// Overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub short_window: Option<usize>,
    pub long_window: Option<usize>,
    pub annualization_factor: Option<f64>,
}

impl CliConfig {
    /// Load configuration from a TOML file.
    ///
    /// Estimator and weight sections are validated while parsing.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| ConfigError::FileError(format!("{}: {}", path.display(), e)))
    }

    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::FileError(e.to_string()))
    }

    /// Apply `VOLCTL_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply `VOLCTL_*` overrides read through `lookup`.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level.parse()?;
        }
        let short = parse_env(&lookup, ENV_SHORT_WINDOW)?;
        let long = parse_env(&lookup, ENV_LONG_WINDOW)?;
        let factor = parse_env(&lookup, ENV_ANNUALIZATION_FACTOR)?;
        self.override_estimator(short, long, factor)
    }

    /// Apply command-line overrides.
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(level) = &cli.log_level {
            self.log_level = level.parse()?;
        }
        self.override_estimator(cli.short_window, cli.long_window, cli.annualization_factor)
    }

    fn override_estimator(
        &mut self,
        short: Option<usize>,
        long: Option<usize>,
        factor: Option<f64>,
    ) -> Result<(), ConfigError> {
        let mut estimator = self.estimator;
        if short.is_some() || long.is_some() {
            estimator = estimator.with_windows(
                short.unwrap_or(estimator.short_window()),
                long.unwrap_or(estimator.long_window()),
            )?;
        }
        if let Some(factor) = factor {
            estimator = estimator.with_annualization_factor(factor)?;
        }
        self.estimator = estimator;
        Ok(())
    }

    /// Engine built from this configuration.
    pub fn engine(&self) -> VolatilityEngine {
        VolatilityEngine::new(self.estimator, self.blend)
            .with_validator(QualityValidator::new(self.quality))
    }
}

fn parse_env<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("{}={}: {}", key, raw, e)))
        })
        .transpose()
}

/// Build configuration with precedence: CLI > ENV > File > Defaults
pub fn build_config(cli: &CliArgs) -> Result<CliConfig, ConfigError> {
    let mut config = if let Some(config_path) = &cli.config_file {
        CliConfig::from_file(config_path)?
    } else {
        CliConfig::default()
    };

    config.apply_env()?;
    config.merge_with_cli(cli)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    // ================================================================
    // Defaults and parsing
    // ================================================================

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.estimator, EstimatorConfig::default());
        assert_eq!(config.blend, BlendWeights::default());
        assert_eq!(config.quality, QualityThresholds::default());
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("TRACE".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!(matches!(
            "loud".parse::<LogLevel>(),
            Err(ConfigError::InvalidLogLevel(s)) if s == "loud"
        ));
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }

    #[test]
    fn test_from_toml_sections() {
        let config = CliConfig::from_toml(
            r#"
            log_level = "debug"

            [estimator]
            short_window = 10
            long_window = 30

            [blend]
            realized_short = 0.5
            realized_long = 0.5
            implied = 0.0

            [quality]
            max_gap_days = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.estimator.short_window(), 10);
        assert_eq!(config.estimator.annualization_factor(), 252.0);
        assert_eq!(config.blend.implied(), 0.0);
        assert_eq!(config.quality.max_gap_days, 3);
        assert_eq!(config.quality.min_data_points, 20);
    }

    #[test]
    fn test_from_toml_rejects_invalid_sections() {
        let err = CliConfig::from_toml(
            "[blend]\nrealized_short = 0.9\nrealized_long = 0.9\nimplied = 0.9",
        )
        .unwrap_err();
        assert!(err.to_string().contains("must sum to 1.0"));

        assert!(CliConfig::from_toml("[estimator]\nshort_window = 1").is_err());
        assert!(CliConfig::from_toml("colour = \"blue\"").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("volctl.toml");
        std::fs::write(&path, "[estimator]\nannualization_factor = 365.0\n").unwrap();
        let config = CliConfig::from_file(&path).unwrap();
        assert_eq!(config.estimator.annualization_factor(), 365.0);

        let missing = CliConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ConfigError::FileError(_))));
    }

    // ================================================================
    // Overrides
    // ================================================================

    #[test]
    fn test_env_overrides() {
        let mut config = CliConfig::default();
        config
            .apply_env_with(env(&[
                (ENV_LOG_LEVEL, "info"),
                (ENV_SHORT_WINDOW, "5"),
                (ENV_ANNUALIZATION_FACTOR, "52"),
            ]))
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.estimator.short_window(), 5);
        assert_eq!(config.estimator.long_window(), 60);
        assert_eq!(config.estimator.annualization_factor(), 52.0);
    }

    #[test]
    fn test_env_parse_error_names_variable() {
        let mut config = CliConfig::default();
        let err = config
            .apply_env_with(env(&[(ENV_LONG_WINDOW, "sixty")]))
            .unwrap_err();
        assert!(matches!(&err, ConfigError::EnvError(msg) if msg.contains(ENV_LONG_WINDOW)));
    }

    #[test]
    fn test_env_windows_are_validated() {
        let mut config = CliConfig::default();
        let err = config
            .apply_env_with(env(&[(ENV_SHORT_WINDOW, "90")]))
            .unwrap_err();
        assert!(err.to_string().contains("long_window (60) must be >= short_window (90)"));
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut config = CliConfig::default();
        config
            .apply_env_with(env(&[(ENV_SHORT_WINDOW, "5"), (ENV_LOG_LEVEL, "info")]))
            .unwrap();
        let cli = CliArgs {
            short_window: Some(15),
            long_window: Some(45),
            log_level: Some("error".to_string()),
            ..Default::default()
        };
        config.merge_with_cli(&cli).unwrap();
        assert_eq!(config.estimator.short_window(), 15);
        assert_eq!(config.estimator.long_window(), 45);
        assert_eq!(config.log_level, LogLevel::Error);
    }

    #[test]
    fn test_engine_uses_configuration() {
        let mut config = CliConfig::default();
        config
            .merge_with_cli(&CliArgs {
                annualization_factor: Some(12.0),
                ..Default::default()
            })
            .unwrap();
        let engine = config.engine();
        assert_eq!(engine.config().annualization_factor(), 12.0);
        assert_eq!(engine.weights(), &BlendWeights::default());
    }
}
