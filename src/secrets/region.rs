//! Region source for the Secrets Manager client.
//!
//! The region is read on every fetch through a [`RegionProvider`], so tests
//! (and embedders with their own configuration layer) can supply it without
//! touching the process environment.

use std::env;
use std::fmt;

use super::error::{Result, SecretsError};

/// Environment variable holding the Secrets Manager region.
pub const REGION_ENV_KEY: &str = "AWS_SECRETSMANAGER_REGION";

/// Supplies the region for a fetch.
pub trait RegionProvider: Send + Sync + fmt::Debug {
    /// The raw region value, `None` when the source has nothing set.
    fn region(&self) -> Option<String>;

    /// Where the region comes from, used in the `RegionNotConfigured` message.
    fn source_name(&self) -> &str;

    /// The region, trimmed. Empty or missing values are `RegionNotConfigured`.
    fn resolve(&self) -> Result<String> {
        match self.region() {
            Some(region) if !region.trim().is_empty() => Ok(region.trim().to_string()),
            _ => Err(SecretsError::region_not_configured(self.source_name())),
        }
    }
}

/// Reads the region from an environment variable at call time.
#[derive(Debug, Clone)]
pub struct EnvRegionProvider {
    key: String,
}

impl EnvRegionProvider {
    /// Read from `AWS_SECRETSMANAGER_REGION`.
    pub fn new() -> Self {
        Self::with_key(REGION_ENV_KEY)
    }

    /// Read from a custom variable.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for EnvRegionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionProvider for EnvRegionProvider {
    fn region(&self) -> Option<String> {
        env::var(&self.key).ok()
    }

    fn source_name(&self) -> &str {
        &self.key
    }
}

/// A fixed region, e.g. from a config file or a CLI flag.
#[derive(Debug, Clone)]
pub struct StaticRegionProvider {
    region: String,
    source: String,
}

impl StaticRegionProvider {
    pub fn new(region: impl Into<String>) -> Self {
        Self::with_source(region, "a region")
    }

    /// A fixed region whose origin (e.g. `--region`) is named in errors.
    pub fn with_source(region: impl Into<String>, source: impl Into<String>) -> Self {
        Self { region: region.into(), source: source.into() }
    }
}

impl RegionProvider for StaticRegionProvider {
    fn region(&self) -> Option<String> {
        Some(self.region.clone())
    }

    fn source_name(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_region_resolves() {
        let provider = StaticRegionProvider::new("us-east-1");
        assert_eq!(provider.resolve().unwrap(), "us-east-1");
    }

    #[test]
    fn test_blank_region_is_not_configured() {
        for region in ["", "   ", "\t"] {
            let err = StaticRegionProvider::new(region).resolve().unwrap_err();
            assert!(err.is_region_not_configured(), "region {:?} should be rejected", region);
        }
    }

    #[test]
    fn test_static_source_named_in_error() {
        let err = StaticRegionProvider::with_source("", "--region").resolve().unwrap_err();
        assert_eq!(
            err.to_string(),
            "region not specified for AWS Secrets Manager (set --region)"
        );

        let err = StaticRegionProvider::new(" ").resolve().unwrap_err();
        assert!(err.to_string().ends_with("(set a region)"));
    }

    #[test]
    fn test_region_is_trimmed() {
        assert_eq!(StaticRegionProvider::new(" eu-west-1 ").resolve().unwrap(), "eu-west-1");
    }

    // Unique variable names keep these tests independent of each other.
    #[test]
    fn test_env_region_unset() {
        let key = format!("SECRET_RETRIEVER_TEST_REGION_UNSET_{}", std::process::id());
        std::env::remove_var(&key);

        let err = EnvRegionProvider::with_key(&key).resolve().unwrap_err();
        assert!(err.is_region_not_configured());
        assert!(err.to_string().contains(&key));
    }

    #[test]
    fn test_env_region_set() {
        let key = format!("SECRET_RETRIEVER_TEST_REGION_SET_{}", std::process::id());
        std::env::set_var(&key, "ap-southeast-2");

        assert_eq!(EnvRegionProvider::with_key(&key).resolve().unwrap(), "ap-southeast-2");

        std::env::remove_var(&key);
    }

    #[test]
    fn test_default_key() {
        assert_eq!(EnvRegionProvider::default().source_name(), "AWS_SECRETSMANAGER_REGION");
    }
}
