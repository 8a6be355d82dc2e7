//! Secret retrieval from AWS Secrets Manager.
//!
//! The [`SecretRetriever`] fetches one secret per call and delivers exactly one
//! [`SecretsManagerResponse`]: the secret payload or the error that stopped it.
//!
//! # Architecture
//!
//! Everything the retriever touches outside its own logic is injected:
//! - [`RegionProvider`]: where the region comes from (env var by default)
//! - [`ClientFactory`] / [`SecretsManagerApi`]: configuration loading and the
//!   `GetSecretValue` call (AWS SDK in [`aws`], behind the `aws` feature)
//! - [`LogSink`]: where failure entries go
//!
//! Cancellation and deadlines arrive through a [`FetchContext`].
//!
//! # Failure taxonomy
//!
//! - `ClientConstruction` wrapping `RegionNotConfigured` or `ConfigLoad`
//! - `RemoteFetch` wrapping a [`FetchFailure`] (service, transport, canceled, deadline)
//!
//! Each failure produces one log entry and one response. No retries, no caching.

#[cfg(feature = "aws")]
pub mod aws;
pub mod client;
pub mod context;
pub mod error;
pub mod log_sink;
pub mod region;
pub mod request;
pub mod response;
pub mod retriever;
pub mod types;

pub use client::{ClientFactory, SecretsManagerApi};
pub use context::FetchContext;
pub use error::{FetchFailure, Result, SecretsError};
pub use log_sink::{
    FileLogSink, LogEntry, LogFields, LogSink, LogSinkError, MemoryLogSink, Severity,
    TracingLogSink,
};
pub use region::{EnvRegionProvider, RegionProvider, StaticRegionProvider, REGION_ENV_KEY};
pub use request::{GetSecretValueRequest, VERSION_STAGE_CURRENT};
pub use response::SecretsManagerResponse;
pub use retriever::SecretRetriever;
pub use types::{SecretString, SecretValue};

#[cfg(feature = "aws")]
pub use aws::{AwsClientFactory, AwsSecretsManagerClient};
