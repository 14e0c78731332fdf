//! Layered configuration loading: programmatic defaults, then an optional
//! project file, then environment variables — highest precedence wins.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use super::engine_config::EngineConfig;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("default_fanout must be at least 1")]
    InvalidFanout,
    #[error("default_timeout must be positive if set")]
    InvalidTimeout,
    #[error("log_level {0:?} is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Loads `EngineConfig` with precedence (lowest to highest):
/// 1. Programmatic defaults.
/// 2. `.milkcheck/config.yaml`, if present.
/// 3. Environment variables prefixed `MILKCHECK_` (double underscore splits
///    nested keys, e.g. `MILKCHECK_LOG_LEVEL=debug`).
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load() -> Result<EngineConfig> {
        Self::load_from_file(".milkcheck/config.yaml")
    }

    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<EngineConfig> {
        let config: EngineConfig = Figment::new()
            .merge(Serialized::defaults(EngineConfig::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("MILKCHECK_").split("__"))
            .extract()
            .context("failed to extract engine configuration")?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
        if config.default_fanout == 0 {
            return Err(ConfigError::InvalidFanout);
        }
        if let Some(t) = config.default_timeout {
            if t <= 0.0 {
                return Err(ConfigError::InvalidTimeout);
            }
        }
        if !["trace", "debug", "info", "warn", "error"].contains(&config.log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.log_level.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        assert!(ConfigLoader::validate(&EngineConfig::default()).is_ok());
    }

    #[test]
    fn zero_fanout_is_rejected() {
        let mut config = EngineConfig::default();
        config.default_fanout = 0;
        assert_eq!(ConfigLoader::validate(&config), Err(ConfigError::InvalidFanout));
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut config = EngineConfig::default();
        config.log_level = "verbose".to_string();
        assert!(ConfigLoader::validate(&config).is_err());
    }

    #[test]
    fn load_from_missing_file_falls_back_to_defaults() {
        let config = ConfigLoader::load_from_file(".milkcheck/does-not-exist.yaml").unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
