//! # Configuration Settings
//!
//! Defines the configuration structure for the secret retriever.

use crate::errors::{Error, Result};
use crate::secrets::{LogFields, REGION_ENV_KEY};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

/// Secret retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RetrieverConfig {
    /// Environment variable the region is read from at fetch time
    #[validate(length(min = 1, message = "Region variable name cannot be empty"))]
    pub region_env_key: String,

    /// Optional Secrets Manager endpoint override
    pub endpoint_url: Option<String>,

    /// Component name stamped on log entries
    #[validate(length(min = 1, message = "Component name cannot be empty"))]
    pub component: String,

    /// Environment tag stamped on log entries
    #[validate(length(min = 1, message = "Environment tag cannot be empty"))]
    pub environment: String,

    /// Write failure entries as JSON lines to this file instead of `tracing`
    pub log_file: Option<PathBuf>,

    /// Deadline applied by the CLI to a fetch
    #[validate(range(min = 1, max = 3600, message = "Timeout must be between 1 and 3600 seconds"))]
    pub timeout_seconds: u64,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            region_env_key: REGION_ENV_KEY.to_string(),
            endpoint_url: None,
            component: crate::secrets::log_sink::DEFAULT_COMPONENT.to_string(),
            environment: "development".to_string(),
            log_file: None,
            timeout_seconds: 30,
        }
    }
}

impl RetrieverConfig {
    /// Load configuration from environment variables
    ///
    /// Uses:
    /// - `AWS_SECRETSMANAGER_ENDPOINT` (optional)
    /// - `SECRET_RETRIEVER_COMPONENT` (default: "AWSSecretsManager")
    /// - `SECRET_RETRIEVER_ENVIRONMENT` (default: "development")
    /// - `SECRET_RETRIEVER_LOG_FILE` (optional)
    /// - `SECRET_RETRIEVER_TIMEOUT_SECS` (default: 30)
    ///
    /// The region itself is not read here; it is read on every fetch.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let endpoint_url = non_empty_var("AWS_SECRETSMANAGER_ENDPOINT");
        let component = non_empty_var("SECRET_RETRIEVER_COMPONENT").unwrap_or(defaults.component);
        let environment =
            non_empty_var("SECRET_RETRIEVER_ENVIRONMENT").unwrap_or(defaults.environment);
        let log_file = non_empty_var("SECRET_RETRIEVER_LOG_FILE").map(PathBuf::from);

        let timeout_seconds = match non_empty_var("SECRET_RETRIEVER_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| Error::config(format!("Invalid SECRET_RETRIEVER_TIMEOUT_SECS: {}", e)))?,
            None => defaults.timeout_seconds,
        };

        let config = Self {
            region_env_key: defaults.region_env_key,
            endpoint_url,
            component,
            environment,
            log_file,
            timeout_seconds,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn log_fields(&self) -> LogFields {
        LogFields::new(&self.component, &self.environment)
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Service name reported at startup
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,

    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: crate::APP_NAME.to_string(),
            log_level: "info".to_string(),
            json_logging: false,
        }
    }
}

impl ObservabilityConfig {
    /// Load observability settings from environment variables
    ///
    /// Uses:
    /// - `SECRET_RETRIEVER_LOG_LEVEL` (default: "info")
    /// - `SECRET_RETRIEVER_JSON_LOGS` (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let log_level = non_empty_var("SECRET_RETRIEVER_LOG_LEVEL").unwrap_or(defaults.log_level);
        let json_logging = std::env::var("SECRET_RETRIEVER_JSON_LOGS")
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(defaults.json_logging);

        Self { service_name: defaults.service_name, log_level, json_logging }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
