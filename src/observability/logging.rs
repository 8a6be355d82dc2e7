//! # Structured Logging
//!
//! Span macros and startup logging helpers on top of `tracing`.

/// Create a tracing span for one secret fetch.
///
/// Every event emitted while the fetch runs carries the secret identifier and
/// the request id that is also stamped on the fetch's log-sink entry.
///
/// ```rust,ignore
/// let span = fetch_span!("prod/db/password", uuid::Uuid::new_v4());
/// ```
#[macro_export]
macro_rules! fetch_span {
    ($secret_id:expr, $request_id:expr) => {
        tracing::info_span!(
            "secret_fetch",
            secret_id = %$secret_id,
            request_id = %$request_id
        )
    };
}

/// Log configuration at startup
pub fn log_config_info(config: &crate::config::RetrieverConfig) {
    tracing::info!(
        region_env_key = %config.region_env_key,
        endpoint = ?config.endpoint_url,
        component = %config.component,
        environment = %config.environment,
        log_file = ?config.log_file,
        timeout_seconds = config.timeout_seconds,
        "Secret retriever configuration"
    );
}
