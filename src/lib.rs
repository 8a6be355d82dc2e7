//! # secret-retriever
//!
//! Fetches a single named secret from AWS Secrets Manager and delivers the
//! outcome, payload or error, as exactly one message on a channel.
//!
//! ## Architecture
//!
//! ```text
//! RegionProvider → ClientFactory → SecretsManagerApi::get_secret_value → response channel
//!                                                     ↓ (on failure)
//!                                                  LogSink
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use secret_retriever::secrets::{FetchContext, SecretRetriever, TracingLogSink};
//!
//! #[tokio::main]
//! async fn main() {
//!     let retriever = SecretRetriever::from_env(Arc::new(TracingLogSink));
//!     let response = retriever.spawn_fetch(FetchContext::background(), "prod/db/password");
//!
//!     match response.await {
//!         Ok(response) => println!("fetched: {}", response.is_success()),
//!         Err(_) => eprintln!("fetch task ended without a response"),
//!     }
//! }
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod observability;
pub mod secrets;

// Re-export commonly used types and traits
pub use config::{ObservabilityConfig, RetrieverConfig};
pub use errors::{Error, Result};
pub use secrets::{
    FetchContext, SecretRetriever, SecretValue, SecretsError, SecretsManagerResponse,
};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
