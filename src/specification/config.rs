//! Provider Configuration
//!
//! Logging switches and composition limits for a `SpecificationProvider`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{SpecResult, SpecificationError};
use crate::observability::{Logger, Severity};

/// Specification provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Emit JSON log lines (default: false)
    #[serde(default)]
    pub log_enabled: bool,

    /// Lowest severity written when logging is enabled (default: INFO)
    #[serde(default = "default_min_log_severity")]
    pub min_log_severity: Severity,

    /// Upper bound on operands accepted by `compose` (default: 64)
    #[serde(default = "default_max_compose_operands")]
    pub max_compose_operands: usize,
}

fn default_min_log_severity() -> Severity {
    Severity::Info
}

fn default_max_compose_operands() -> usize {
    64
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            log_enabled: false,
            min_log_severity: default_min_log_severity(),
            max_compose_operands: default_max_compose_operands(),
        }
    }
}

impl ProviderConfig {
    /// Default config with logging turned on at `min_log_severity`
    pub fn logging(min_log_severity: Severity) -> Self {
        Self {
            log_enabled: true,
            min_log_severity,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> SpecResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SpecificationError::config_invalid(format!("Malformed provider config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> SpecResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            SpecificationError::config_invalid(format!(
                "Cannot read provider config '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&raw)
    }

    /// Reject settings no provider can honor
    pub fn validate(&self) -> SpecResult<()> {
        if self.max_compose_operands == 0 {
            return Err(SpecificationError::config_invalid(
                "max_compose_operands must be at least 1",
            ));
        }
        Ok(())
    }

    /// Logger matching these settings
    pub fn logger(&self) -> Logger {
        if self.log_enabled {
            Logger::new(self.min_log_severity)
        } else {
            Logger::disabled()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::SpecificationErrorCode;

    #[test]
    fn test_default_config() {
        let config = ProviderConfig::default();
        assert!(!config.log_enabled);
        assert_eq!(config.min_log_severity, Severity::Info);
        assert_eq!(config.max_compose_operands, 64);
        assert_eq!(config.logger(), Logger::disabled());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ProviderConfig::from_json(r#"{"log_enabled": true}"#).unwrap();
        assert!(config.log_enabled);
        assert_eq!(config.min_log_severity, Severity::Info);
        assert_eq!(config.max_compose_operands, 64);
    }

    #[test]
    fn test_full_json() {
        let config = ProviderConfig::from_json(
            r#"{"log_enabled": true, "min_log_severity": "WARN", "max_compose_operands": 4}"#,
        )
        .unwrap();
        assert_eq!(config.min_log_severity, Severity::Warn);
        assert_eq!(config.max_compose_operands, 4);
        assert_eq!(config.logger(), Logger::new(Severity::Warn));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = ProviderConfig::from_json("{not json").unwrap_err();
        assert_eq!(err.code(), SpecificationErrorCode::SpecConfigInvalid);
    }

    #[test]
    fn test_zero_operands_rejected() {
        let err = ProviderConfig::from_json(r#"{"max_compose_operands": 0}"#).unwrap_err();
        assert_eq!(err.code(), SpecificationErrorCode::SpecConfigInvalid);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ProviderConfig::load("/definitely/not/here.json").unwrap_err();
        assert_eq!(err.code(), SpecificationErrorCode::SpecConfigInvalid);
        assert!(err.message().contains("/definitely/not/here.json"));
    }
}
