//! Integration tests for configuration management
//!
//! These tests validate that configuration and the region source read the
//! environment the way the retriever expects.

mod common;

use common::{RemoteBehavior, ScriptedFactory};
use secret_retriever::secrets::{
    EnvRegionProvider, FetchContext, LogSink, MemoryLogSink, RegionProvider, SecretRetriever,
};
use secret_retriever::{Result, RetrieverConfig};
use std::env;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// Use a mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const CONFIG_VARS: [&str; 5] = [
    "AWS_SECRETSMANAGER_ENDPOINT",
    "SECRET_RETRIEVER_COMPONENT",
    "SECRET_RETRIEVER_ENVIRONMENT",
    "SECRET_RETRIEVER_LOG_FILE",
    "SECRET_RETRIEVER_TIMEOUT_SECS",
];

fn save(keys: &[&str]) -> Vec<(String, Option<String>)> {
    keys.iter().map(|key| (key.to_string(), env::var(key).ok())).collect()
}

fn restore(saved: Vec<(String, Option<String>)>) {
    for (key, value) in saved {
        match value {
            Some(value) => env::set_var(&key, value),
            None => env::remove_var(&key),
        }
    }
}

/// Test that configuration properly reads environment variables
#[test]
fn test_config_environment_integration() -> Result<()> {
    let _guard = ENV_MUTEX.lock().unwrap();
    let saved = save(&CONFIG_VARS);

    env::set_var("AWS_SECRETSMANAGER_ENDPOINT", "http://localhost:4566");
    env::set_var("SECRET_RETRIEVER_COMPONENT", "Billing");
    env::set_var("SECRET_RETRIEVER_ENVIRONMENT", "staging");
    env::set_var("SECRET_RETRIEVER_LOG_FILE", "/tmp/secret-retriever.log");
    env::set_var("SECRET_RETRIEVER_TIMEOUT_SECS", "12");

    let config = RetrieverConfig::from_env()?;
    assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
    assert_eq!(config.component, "Billing");
    assert_eq!(config.environment, "staging");
    assert_eq!(config.log_file.as_deref(), Some(std::path::Path::new("/tmp/secret-retriever.log")));
    assert_eq!(config.timeout(), Duration::from_secs(12));

    let fields = config.log_fields();
    assert_eq!(fields.component, "Billing");
    assert_eq!(fields.environment, "staging");

    // Test with invalid timeout
    env::set_var("SECRET_RETRIEVER_TIMEOUT_SECS", "soon");
    assert!(RetrieverConfig::from_env().is_err());

    // Out of range timeout fails validation
    env::set_var("SECRET_RETRIEVER_TIMEOUT_SECS", "0");
    assert!(RetrieverConfig::from_env().is_err());

    restore(saved);
    Ok(())
}

/// Test that configuration defaults work when no environment variables are set
#[test]
fn test_config_defaults_integration() -> Result<()> {
    let _guard = ENV_MUTEX.lock().unwrap();
    let saved = save(&CONFIG_VARS);

    for key in CONFIG_VARS {
        env::remove_var(key);
    }
    // Blank values fall back to defaults
    env::set_var("SECRET_RETRIEVER_ENVIRONMENT", "   ");

    let config = RetrieverConfig::from_env()?;
    assert_eq!(config.region_env_key, "AWS_SECRETSMANAGER_REGION");
    assert!(config.endpoint_url.is_none());
    assert_eq!(config.component, "AWSSecretsManager");
    assert_eq!(config.environment, "development");
    assert!(config.log_file.is_none());
    assert_eq!(config.timeout(), Duration::from_secs(30));

    restore(saved);
    Ok(())
}

/// The region is read on every fetch, not once at construction
#[tokio::test]
async fn test_region_read_at_fetch_time() {
    const KEY: &str = "SECRET_RETRIEVER_TEST_REGION";

    let _guard = ENV_MUTEX.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let saved = save(&[KEY]);

    let factory = ScriptedFactory::remote(RemoteBehavior::Succeed("topsecret"));
    let sink = Arc::new(MemoryLogSink::new());
    let log_sink: Arc<dyn LogSink> = sink.clone();
    let retriever =
        SecretRetriever::new(Arc::new(EnvRegionProvider::with_key(KEY)), factory.clone(), log_sink);

    env::remove_var(KEY);
    let response = retriever.fetch(&FetchContext::background(), "db/password").await;
    assert!(response.error().map(|e| e.is_region_not_configured()).unwrap_or(false));
    assert_eq!(factory.clients_built(), 0);

    env::set_var(KEY, "eu-west-1");
    let response = retriever.fetch(&FetchContext::background(), "db/password").await;
    assert!(response.is_success());
    assert_eq!(factory.clients_built(), 1);
    assert_eq!(sink.len(), 1);

    restore(saved);
}

#[test]
fn test_env_region_provider_trims_value() {
    const KEY: &str = "SECRET_RETRIEVER_TEST_REGION_TRIM";

    let _guard = ENV_MUTEX.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let saved = save(&[KEY]);

    let provider = EnvRegionProvider::with_key(KEY);

    env::set_var(KEY, "  ap-southeast-2\n");
    assert_eq!(provider.resolve().unwrap(), "ap-southeast-2");

    env::set_var(KEY, "\t");
    assert!(provider.resolve().unwrap_err().is_region_not_configured());

    restore(saved);
}
