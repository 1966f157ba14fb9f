//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::core::errors::{Result, TranslationError};

/// Default MyMemory endpoint (no API key required)
pub const DEFAULT_ENDPOINT: &str = "https://api.mymemory.translated.net/get";

/// Configuration for translator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// MyMemory compatible `GET` endpoint
    pub api_endpoint: String,
    /// Sent as MyMemory's `de` parameter, which raises the anonymous quota
    pub contact_email: Option<String>,
    /// Maximum number of translation calls in flight
    pub batch_size: usize,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Fall back to the source text when the service drops a placeholder
    pub strict_placeholders: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_ENDPOINT.to_string(),
            contact_email: None,
            batch_size: 10,
            timeout_ms: 8000,
            strict_placeholders: true,
        }
    }
}

impl TranslatorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let api_endpoint = std::env::var("API_ENDPOINT").unwrap_or(defaults.api_endpoint);

        let contact_email = std::env::var("MYMEMORY_EMAIL")
            .ok()
            .filter(|email| !email.trim().is_empty());

        let batch_size = env_parse("BATCH_SIZE", defaults.batch_size)?;
        let timeout_ms = env_parse("REQUEST_TIMEOUT_MS", defaults.timeout_ms)?;
        let strict_placeholders = env_parse("STRICT_PLACEHOLDERS", defaults.strict_placeholders)?;

        let config = Self {
            api_endpoint,
            contact_email,
            batch_size,
            timeout_ms,
            strict_placeholders,
        };
        debug!("Loaded configuration from environment: {:?}", config);
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TranslationError::FileError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_endpoint.trim().is_empty() {
            return Err(TranslationError::ConfigError {
                message: "API endpoint is required".to_string(),
            });
        }

        if self.batch_size == 0 {
            return Err(TranslationError::ConfigError {
                message: "batch_size must be greater than 0".to_string(),
            });
        }

        if self.timeout_ms == 0 {
            return Err(TranslationError::ConfigError {
                message: "timeout_ms must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// No contact email, so MyMemory applies its smaller anonymous quota
    pub fn uses_anonymous_quota(&self) -> bool {
        self.contact_email.is_none()
    }
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|e| TranslationError::ConfigError {
            message: format!("{} has an invalid value '{}': {}", name, raw, e),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let config = TranslatorConfig {
            contact_email: Some("dev@example.com".to_string()),
            ..Default::default()
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_without_email() {
        let config = TranslatorConfig::default();

        assert!(config.validate().is_ok());
        assert!(config.uses_anonymous_quota());
        assert!(!TranslatorConfig {
            contact_email: Some("dev@example.com".to_string()),
            ..Default::default()
        }
        .uses_anonymous_quota());
    }

    #[test]
    fn test_config_validation_zero_batch() {
        let config = TranslatorConfig {
            batch_size: 0,
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_missing_endpoint() {
        let config = TranslatorConfig {
            api_endpoint: " ".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(TranslationError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_env_parse_rejects_garbage() {
        std::env::set_var("XCSTRINGS_TEST_BATCH", "ten");
        assert!(env_parse::<usize>("XCSTRINGS_TEST_BATCH", 10).is_err());
        std::env::set_var("XCSTRINGS_TEST_BATCH", " 25 ");
        assert_eq!(env_parse::<usize>("XCSTRINGS_TEST_BATCH", 10).unwrap(), 25);
        std::env::remove_var("XCSTRINGS_TEST_BATCH");
        assert_eq!(env_parse::<usize>("XCSTRINGS_TEST_BATCH", 10).unwrap(), 10);
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = TranslatorConfig {
            batch_size: 4,
            strict_placeholders: false,
            ..Default::default()
        };

        config.to_file(&path).unwrap();
        let loaded = TranslatorConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_file_partial_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "batch_size": 3 }"#).unwrap();

        let loaded = TranslatorConfig::from_file(&path).unwrap();
        assert_eq!(loaded.batch_size, 3);
        assert_eq!(loaded.timeout_ms, 8000);
        assert_eq!(loaded.api_endpoint, DEFAULT_ENDPOINT);
    }
}
