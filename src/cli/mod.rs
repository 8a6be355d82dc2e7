//! # Command Line Interface
//!
//! `secret-retriever get <SECRET_ID>` fetches one secret and prints it.
//! The secret goes to stdout; logs go to stderr.

use crate::config::{ObservabilityConfig, RetrieverConfig};
use crate::observability::{init_logging, log_config_info};
use crate::secrets::{
    AwsClientFactory, EnvRegionProvider, FetchContext, FileLogSink, LogSink, RegionProvider,
    SecretRetriever, SecretValue, SecretsManagerResponse, StaticRegionProvider, TracingLogSink,
};
use anyhow::Context;
use base64::Engine;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "secret-retriever")]
#[command(about = "Fetch a secret from AWS Secrets Manager")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the current version of a secret
    Get {
        /// Secret name or ARN
        secret_id: String,

        /// Region override (default: read from AWS_SECRETSMANAGER_REGION)
        #[arg(long)]
        region: Option<String>,

        /// Deadline in seconds (default: SECRET_RETRIEVER_TIMEOUT_SECS or 30)
        #[arg(long)]
        timeout: Option<u64>,

        /// Print secret metadata as JSON (the value itself is redacted)
        #[arg(long)]
        json: bool,
    },
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let mut observability = ObservabilityConfig::from_env();
    if cli.verbose {
        observability.log_level = "debug".to_string();
    }
    init_logging(&observability)?;

    let config = RetrieverConfig::from_env()?;
    log_config_info(&config);

    match cli.command {
        Commands::Get { secret_id, region, timeout, json } => {
            let retriever = build_retriever(&config, region)?;
            let timeout = timeout.map(std::time::Duration::from_secs).unwrap_or(config.timeout());
            let response = fetch_with_signal(retriever, secret_id, timeout).await?;
            print_response(response, json)
        }
    }
}

fn build_retriever(
    config: &RetrieverConfig,
    region: Option<String>,
) -> anyhow::Result<SecretRetriever> {
    let region_provider: Arc<dyn RegionProvider> = match region {
        Some(region) => Arc::new(StaticRegionProvider::with_source(region, "--region")),
        None => Arc::new(EnvRegionProvider::with_key(&config.region_env_key)),
    };

    let mut factory = AwsClientFactory::new();
    if let Some(endpoint) = &config.endpoint_url {
        factory = factory.with_endpoint(endpoint);
    }

    let log_sink: Arc<dyn LogSink> = match &config.log_file {
        Some(path) => Arc::new(
            FileLogSink::open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?,
        ),
        None => Arc::new(TracingLogSink),
    };

    Ok(SecretRetriever::new(region_provider, Arc::new(factory), log_sink)
        .with_log_fields(config.log_fields()))
}

/// Run the fetch on its own task and wait for its single response.
/// Ctrl-C cancels the fetch context.
async fn fetch_with_signal(
    retriever: SecretRetriever,
    secret_id: String,
    timeout: std::time::Duration,
) -> anyhow::Result<SecretsManagerResponse> {
    let ctx = FetchContext::background().with_timeout(timeout);
    let (tx, mut rx) = mpsc::channel(1);

    let signal_ctx = ctx.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, canceling fetch");
            signal_ctx.cancel();
        }
    });

    let fetch_task = tokio::spawn(async move {
        if let Err(e) = retriever.fetch_to(&ctx, &secret_id, &tx).await {
            warn!(error = %e, "Fetch result was not delivered");
        }
    });

    let response = rx.recv().await;
    signal_task.abort();
    fetch_task.await.context("fetch task failed")?;

    response.context("fetch finished without a response")
}

fn print_response(response: SecretsManagerResponse, json: bool) -> anyhow::Result<()> {
    let value = response.into_result()?;
    info!(name = ?value.name, version_id = ?value.version_id, "Secret retrieved");

    if json {
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", render_value(&value)?);
    Ok(())
}

fn render_value(value: &SecretValue) -> anyhow::Result<String> {
    match (value.secret_str(), value.secret_binary.as_deref()) {
        (Some(text), _) => Ok(text.to_string()),
        (None, Some(bytes)) => Ok(base64::engine::general_purpose::STANDARD.encode(bytes)),
        (None, None) => anyhow::bail!("secret has neither a string nor a binary value"),
    }
}
