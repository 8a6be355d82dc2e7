//! Secret retriever.
//!
//! One fetch is one pipeline: resolve the region, build a client for it,
//! request the `AWSCURRENT` version of the secret and produce exactly one
//! [`SecretsManagerResponse`]. Failures are written to the [`LogSink`] once
//! and returned in the response; they never unwind.
//!
//! ```rust,ignore
//! use secret_retriever::secrets::{FetchContext, SecretRetriever};
//! use tokio::sync::mpsc;
//!
//! let retriever = SecretRetriever::from_env(Arc::new(TracingLogSink));
//! let (tx, mut rx) = mpsc::channel(1);
//!
//! tokio::spawn(async move {
//!     retriever.fetch_to(&FetchContext::background(), "prod/db/password", &tx).await
//! });
//!
//! let response = rx.recv().await.expect("one response");
//! ```

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn, Instrument};
use uuid::Uuid;

use super::client::{ClientFactory, SecretsManagerApi};
use super::context::FetchContext;
use super::error::{Result, SecretsError};
use super::log_sink::{LogEntry, LogFields, LogSink};
use super::region::RegionProvider;
use super::request::GetSecretValueRequest;
use super::response::SecretsManagerResponse;

/// Fetches single secrets through injected region, client and log capabilities.
///
/// Cloning is cheap; clones share the same collaborators.
#[derive(Debug, Clone)]
pub struct SecretRetriever {
    region_provider: Arc<dyn RegionProvider>,
    client_factory: Arc<dyn ClientFactory>,
    log_sink: Arc<dyn LogSink>,
    log_fields: LogFields,
}

impl SecretRetriever {
    pub fn new(
        region_provider: Arc<dyn RegionProvider>,
        client_factory: Arc<dyn ClientFactory>,
        log_sink: Arc<dyn LogSink>,
    ) -> Self {
        Self { region_provider, client_factory, log_sink, log_fields: LogFields::default() }
    }

    /// Retriever for AWS: region from `AWS_SECRETSMANAGER_REGION`, endpoint
    /// override from `AWS_SECRETSMANAGER_ENDPOINT`.
    #[cfg(feature = "aws")]
    pub fn from_env(log_sink: Arc<dyn LogSink>) -> Self {
        Self::new(
            Arc::new(super::region::EnvRegionProvider::new()),
            Arc::new(super::aws::AwsClientFactory::from_env()),
            log_sink,
        )
    }

    /// Set the component and environment stamped on log entries.
    pub fn with_log_fields(mut self, log_fields: LogFields) -> Self {
        self.log_fields = log_fields;
        self
    }

    pub fn log_fields(&self) -> &LogFields {
        &self.log_fields
    }

    /// Fetch `secret_id` and return the response.
    ///
    /// # Panics
    ///
    /// Panics if the log sink fails to accept a failure entry. A broken sink
    /// means failures would go unrecorded, which is treated as fatal.
    pub async fn fetch(&self, ctx: &FetchContext, secret_id: &str) -> SecretsManagerResponse {
        let request_id = Uuid::new_v4();
        let span = crate::fetch_span!(secret_id, request_id);

        self.fetch_inner(ctx, secret_id, request_id).instrument(span).await
    }

    /// Fetch `secret_id` and send exactly one response on `out`.
    ///
    /// # Errors
    ///
    /// - [`SecretsError::ResponseChannelClosed`] if the receiver was dropped;
    ///   the response is discarded
    ///
    /// # Panics
    ///
    /// See [`SecretRetriever::fetch`].
    pub async fn fetch_to(
        &self,
        ctx: &FetchContext,
        secret_id: &str,
        out: &mpsc::Sender<SecretsManagerResponse>,
    ) -> Result<()> {
        let response = self.fetch(ctx, secret_id).await;

        out.send(response).await.map_err(|_| {
            warn!(secret_id = %secret_id, "Response receiver dropped before delivery");
            SecretsError::ResponseChannelClosed
        })
    }

    /// Run the fetch on a new task and return the receiving end of its
    /// one-shot response channel.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_fetch(
        &self,
        ctx: FetchContext,
        secret_id: impl Into<String>,
    ) -> oneshot::Receiver<SecretsManagerResponse> {
        let (tx, rx) = oneshot::channel();
        let retriever = self.clone();
        let secret_id = secret_id.into();

        tokio::spawn(async move {
            let response = retriever.fetch(&ctx, &secret_id).await;
            if tx.send(response).is_err() {
                debug!(secret_id = %secret_id, "Response receiver dropped before delivery");
            }
        });

        rx
    }

    async fn fetch_inner(
        &self,
        ctx: &FetchContext,
        secret_id: &str,
        request_id: Uuid,
    ) -> SecretsManagerResponse {
        let client = match self.client().await {
            Ok(client) => client,
            Err(cause) => {
                let error = SecretsError::client_construction(cause);
                self.record_failure(request_id, secret_id, &error);
                return SecretsManagerResponse::failure(error);
            }
        };

        let request = GetSecretValueRequest::current(secret_id);
        debug!(version_stage = request.version_stage(), "Fetching secret");

        let outcome = tokio::select! {
            biased;
            reason = ctx.done() => Err(reason),
            result = client.get_secret_value(&request) => result,
        };

        match outcome {
            Ok(value) => {
                debug!(version_id = ?value.version_id, "Fetched secret");
                SecretsManagerResponse::success(value)
            }
            Err(failure) => {
                let error = SecretsError::remote_fetch(secret_id, failure);
                self.record_failure(request_id, secret_id, &error);
                SecretsManagerResponse::failure(error)
            }
        }
    }

    async fn client(&self) -> Result<Box<dyn SecretsManagerApi>> {
        let region = self.region_provider.resolve()?;
        self.client_factory.create_client(&region).await
    }

    fn record_failure(&self, request_id: Uuid, secret_id: &str, error: &SecretsError) {
        let entry = LogEntry::error(&self.log_fields, request_id, error).with_secret_id(secret_id);

        if let Err(sink_error) = self.log_sink.write(&entry) {
            tracing::error!(error = %sink_error, kind = error.kind(), "Log sink rejected entry");
            panic!("log sink failed to accept entry: {}", sink_error);
        }
    }
}
