//! # Observability Infrastructure
//!
//! Sets up the `tracing` subscriber for the binary. Failure entries produced by
//! the retriever go through its log sink, which may or may not be `tracing`.

pub mod logging;

pub use logging::log_config_info;

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Initialise the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `config.log_level`. Output goes to stderr so stdout
/// stays free for the fetched secret.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| Error::config(format!("Invalid log level '{}': {}", config.log_level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let result = if config.json_logging { builder.json().try_init() } else { builder.try_init() };

    result.map_err(|e| Error::internal(format!("Failed to initialise logging: {}", e)))?;

    tracing::debug!(
        service_name = %config.service_name,
        log_level = %config.log_level,
        json_logging = config.json_logging,
        "Logging initialized"
    );
    Ok(())
}
