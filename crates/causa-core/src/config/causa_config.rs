//! Top-level configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{EvaluationConfig, IdentificationConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`CAUSA_*`)
/// 2. Config file passed to [`CausaConfig::load`]
/// 3. Compiled defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CausaConfig {
    pub identification: IdentificationConfig,
    pub evaluation: EvaluationConfig,
}

impl CausaConfig {
    /// Load a TOML config file, apply env overrides and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::apply_env_overrides(&mut config);
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &CausaConfig) -> Result<(), ConfigError> {
        let tolerance = config.evaluation.zero_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::ValidationFailed {
                field: "evaluation.zero_tolerance".to_string(),
                message: "must be a finite, non-negative number".to_string(),
            });
        }
        if config.identification.max_set_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "identification.max_set_size".to_string(),
                message: "must be at least 1 when set".to_string(),
            });
        }
        Ok(())
    }

    fn apply_env_overrides(config: &mut CausaConfig) {
        if let Some(v) = env_parse::<usize>("CAUSA_MAX_SET_SIZE") {
            config.identification.max_set_size = Some(v);
        }
        if let Some(v) = env_parse::<bool>("CAUSA_TRY_BACKDOOR") {
            config.identification.try_backdoor = v;
        }
        if let Some(v) = env_parse::<bool>("CAUSA_TRY_FRONTDOOR") {
            config.identification.try_frontdoor = v;
        }
        if let Some(v) = env_parse::<bool>("CAUSA_APPLY_RULES") {
            config.identification.apply_rules = v;
        }
        if let Some(v) = env_parse::<f64>("CAUSA_ZERO_TOLERANCE") {
            config.evaluation.zero_tolerance = v;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
