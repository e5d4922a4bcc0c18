//! Configuration system for the task suggestion service
//!
//! TOML-backed configuration covering the HTTP server, the matcher's
//! failure-injection rate, and the retry schedule.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Main service configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    pub service: ServiceSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub matcher: MatcherSection,
}

/// Service identity section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceSection {
    /// Service identifier (must match [a-zA-Z0-9._-]+)
    pub id: String,
    /// Description of what this service does
    pub description: String,
}

/// HTTP server section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Port to bind the HTTP server on (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bind address (default: 0.0.0.0)
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
        }
    }
}

/// Matcher and retry section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatcherSection {
    /// Probability of an injected transient failure per match attempt
    /// (default: 0.1)
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,
    /// Maximum match attempts before giving up (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds; retry i waits base * (i - 1)
    /// (default: 100)
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for MatcherSection {
    fn default() -> Self {
        Self {
            failure_rate: default_failure_rate(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_failure_rate() -> f64 {
    0.1
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    100
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid service ID format: {0}")]
    InvalidServiceId(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ServiceConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ServiceConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_service_id(&self.service.id)?;

        if !(0.0..1.0).contains(&self.matcher.failure_rate) {
            return Err(ConfigError::InvalidConfig(format!(
                "matcher.failure_rate must be in [0.0, 1.0), got {}",
                self.matcher.failure_rate
            )));
        }

        if self.matcher.max_attempts == 0 {
            return Err(ConfigError::InvalidConfig(
                "matcher.max_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Create a test configuration for unit testing
    #[cfg(test)]
    pub fn test_config() -> Self {
        let toml_content = r#"
[service]
id = "test-suggestd"
description = "A test suggestion service"

[matcher]
failure_rate = 0.0
"#;
        toml::from_str(toml_content).expect("Test config should parse")
    }
}

/// Validate service ID format
fn validate_service_id(service_id: &str) -> Result<(), ConfigError> {
    let valid_chars = service_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');

    if service_id.is_empty() || !valid_chars {
        return Err(ConfigError::InvalidServiceId(format!(
            "Service ID '{service_id}' must match pattern [a-zA-Z0-9._-]+"
        )));
    }

    Ok(())
}
