//! # Configuration Management
//!
//! Environment-driven configuration for the retriever and its logging.
//! Values are read once at startup, except the Secrets Manager region, which
//! the retriever reads on every fetch through its region provider.

pub mod settings;

pub use settings::{ObservabilityConfig, RetrieverConfig};
