//! Client seams for the remote Secrets Manager API.
//!
//! [`ClientFactory`] turns a region into a ready client (loading credentials
//! and endpoint configuration on the way). [`SecretsManagerApi`] issues the
//! single `GetSecretValue` call. The AWS SDK implements both in
//! [`super::aws`]; tests substitute their own.

use async_trait::async_trait;
use std::fmt;

use super::error::{FetchFailure, Result};
use super::request::GetSecretValueRequest;
use super::types::SecretValue;

/// A handle able to fetch one secret value.
#[async_trait]
pub trait SecretsManagerApi: Send + Sync + fmt::Debug {
    /// Issue `GetSecretValue` for `request`.
    ///
    /// Implementations do not retry; a failed call is reported as-is.
    async fn get_secret_value(
        &self,
        request: &GetSecretValueRequest,
    ) -> std::result::Result<SecretValue, FetchFailure>;
}

/// Builds a [`SecretsManagerApi`] scoped to a region.
#[async_trait]
pub trait ClientFactory: Send + Sync + fmt::Debug {
    /// Load configuration for `region` and construct a client.
    ///
    /// # Errors
    ///
    /// - [`super::SecretsError::ConfigLoad`] if the configuration cannot be loaded
    async fn create_client(&self, region: &str) -> Result<Box<dyn SecretsManagerApi>>;
}
