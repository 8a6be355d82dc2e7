//! AWS Secrets Manager client implementation
//!
//! Builds an `aws-sdk-secretsmanager` client per fetch and maps SDK output and
//! errors onto the crate's types.
//!
//! ## Configuration
//!
//! - The region comes from the retriever's [`super::RegionProvider`]
//! - Credentials come from the default AWS provider chain (env, profile, IMDS, ...).
//!   They are resolved on the first request, so missing credentials surface as a
//!   `RemoteFetch` transport failure rather than at client construction.
//! - `AWS_SECRETSMANAGER_ENDPOINT` - Optional endpoint override (e.g. LocalStack)

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::config::Region;
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_secretsmanager::operation::get_secret_value::{
    GetSecretValueError, GetSecretValueOutput,
};
use aws_sdk_secretsmanager::Client;
use chrono::DateTime;
use tracing::debug;
use url::Url;

use super::client::{ClientFactory, SecretsManagerApi};
use super::error::{FetchFailure, Result, SecretsError};
use super::request::GetSecretValueRequest;
use super::types::{SecretString, SecretValue};

/// Environment variable holding an optional endpoint override.
pub const ENDPOINT_ENV_KEY: &str = "AWS_SECRETSMANAGER_ENDPOINT";

/// Loads AWS configuration and builds Secrets Manager clients.
#[derive(Debug, Clone, Default)]
pub struct AwsClientFactory {
    endpoint_url: Option<String>,
}

impl AwsClientFactory {
    /// Factory using the regular AWS endpoint for the region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory reading the endpoint override from `AWS_SECRETSMANAGER_ENDPOINT`.
    pub fn from_env() -> Self {
        let endpoint_url =
            std::env::var(ENDPOINT_ENV_KEY).ok().filter(|value| !value.trim().is_empty());
        Self { endpoint_url }
    }

    /// Send requests to `endpoint_url` instead of the regional AWS endpoint.
    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint).map_err(|e| {
        SecretsError::config_load(format!("invalid endpoint URL '{}': {}", endpoint, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(SecretsError::config_load(format!(
            "endpoint URL '{}' must use http or https, got '{}'",
            endpoint, scheme
        ))),
    }
}

#[async_trait]
impl ClientFactory for AwsClientFactory {
    async fn create_client(&self, region: &str) -> Result<Box<dyn SecretsManagerApi>> {
        if let Some(endpoint) = self.endpoint_url.as_deref() {
            validate_endpoint(endpoint)?;
        }

        let shared_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        let mut builder = aws_sdk_secretsmanager::config::Builder::from(&shared_config);
        if let Some(endpoint) = self.endpoint_url.as_deref() {
            builder = builder.endpoint_url(endpoint);
        }

        debug!(
            region = %region,
            endpoint = ?self.endpoint_url,
            "Built AWS Secrets Manager client"
        );

        Ok(Box::new(AwsSecretsManagerClient { client: Client::from_conf(builder.build()) }))
    }
}

/// `SecretsManagerApi` backed by the AWS SDK client.
#[derive(Debug, Clone)]
pub struct AwsSecretsManagerClient {
    client: Client,
}

impl AwsSecretsManagerClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretsManagerApi for AwsSecretsManagerClient {
    async fn get_secret_value(
        &self,
        request: &GetSecretValueRequest,
    ) -> std::result::Result<SecretValue, FetchFailure> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(request.secret_id())
            .version_stage(request.version_stage())
            .send()
            .await
            .map_err(fetch_failure)?;

        Ok(secret_value_from_output(output))
    }
}

fn fetch_failure(err: SdkError<GetSecretValueError>) -> FetchFailure {
    match &err {
        SdkError::ServiceError(context) => {
            let service_err = context.err();
            FetchFailure::service(
                service_err.code().unwrap_or("Unknown"),
                service_err.message().map(str::to_string).unwrap_or_else(|| service_err.to_string()),
            )
        }
        _ => FetchFailure::transport(DisplayErrorContext(&err).to_string()),
    }
}

fn secret_value_from_output(output: GetSecretValueOutput) -> SecretValue {
    SecretValue {
        name: output.name().map(str::to_string),
        arn: output.arn().map(str::to_string),
        version_id: output.version_id().map(str::to_string),
        version_stages: output.version_stages().to_vec(),
        secret_string: output.secret_string().map(SecretString::from),
        secret_binary: output.secret_binary().map(|blob| blob.as_ref().to_vec()),
        created_date: output
            .created_date()
            .and_then(|date| DateTime::from_timestamp(date.secs(), date.subsec_nanos())),
    }
}
