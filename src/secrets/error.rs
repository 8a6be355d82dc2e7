//! Error types for secret retrieval.

use thiserror::Error;

/// Result type for secret retrieval operations.
pub type Result<T> = std::result::Result<T, SecretsError>;

/// Underlying cause of a failed `GetSecretValue` call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The fetch context was canceled while the call was in flight.
    #[error("context canceled")]
    Canceled,

    /// The fetch context deadline passed while the call was in flight.
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// The service answered with an error (e.g. `ResourceNotFoundException`).
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    /// The request never produced a service response (dispatch, timeout, I/O).
    #[error("transport error: {message}")]
    Transport { message: String },
}

impl FetchFailure {
    /// Create a service error.
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service { code: code.into(), message: message.into() }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    /// Whether the failure came from the fetch context rather than AWS.
    pub fn is_context_error(&self) -> bool {
        matches!(self, Self::Canceled | Self::DeadlineExceeded)
    }
}

/// Errors that can occur while retrieving a secret.
///
/// Wrapper variants keep their cause in [`std::error::Error::source`] so the
/// whole chain can be walked (and logged) without repeating messages.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// The region source returned an empty value.
    #[error("region not specified for AWS Secrets Manager (set {key})")]
    RegionNotConfigured { key: String },

    /// Loading the AWS configuration for the region failed.
    #[error("error loading configuration for AWS Secrets Manager: {message}")]
    ConfigLoad { message: String },

    /// The remote client could not be built. Wraps `RegionNotConfigured` or `ConfigLoad`.
    #[error("error retrieving AWS Secrets Manager client")]
    ClientConstruction {
        #[source]
        source: Box<SecretsError>,
    },

    /// The `GetSecretValue` call failed.
    #[error("error retrieving secret '{secret_id}' from AWS Secrets Manager")]
    RemoteFetch {
        secret_id: String,
        #[source]
        source: FetchFailure,
    },

    /// The receiving side of the output channel was dropped before delivery.
    #[error("response channel closed before the result was delivered")]
    ResponseChannelClosed,
}

impl SecretsError {
    /// Create a region-not-configured error.
    pub fn region_not_configured(key: impl Into<String>) -> Self {
        Self::RegionNotConfigured { key: key.into() }
    }

    /// Create a config load error.
    pub fn config_load(message: impl Into<String>) -> Self {
        Self::ConfigLoad { message: message.into() }
    }

    /// Wrap a configuration failure as a client construction error.
    pub fn client_construction(source: SecretsError) -> Self {
        Self::ClientConstruction { source: Box::new(source) }
    }

    /// Create a remote fetch error.
    pub fn remote_fetch(secret_id: impl Into<String>, source: FetchFailure) -> Self {
        Self::RemoteFetch { secret_id: secret_id.into(), source }
    }

    /// The innermost `SecretsError`, looking through `ClientConstruction`.
    pub fn root_cause(&self) -> &SecretsError {
        match self {
            Self::ClientConstruction { source } => source.root_cause(),
            other => other,
        }
    }

    /// Whether this error (or what it wraps) is a missing region.
    pub fn is_region_not_configured(&self) -> bool {
        matches!(self.root_cause(), Self::RegionNotConfigured { .. })
    }

    /// Whether this error (or what it wraps) is a config load failure.
    pub fn is_config_load(&self) -> bool {
        matches!(self.root_cause(), Self::ConfigLoad { .. })
    }

    /// The fetch failure, if this is a remote fetch error.
    pub fn fetch_failure(&self) -> Option<&FetchFailure> {
        match self {
            Self::RemoteFetch { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Stable identifier used in log entries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RegionNotConfigured { .. } => "region_not_configured",
            Self::ConfigLoad { .. } => "config_load",
            Self::ClientConstruction { .. } => "client_construction",
            Self::RemoteFetch { .. } => "remote_fetch",
            Self::ResponseChannelClosed => "response_channel_closed",
        }
    }

    /// Messages of this error and every cause below it, outermost first.
    pub fn chain(&self) -> Vec<String> {
        let mut messages = vec![self.to_string()];
        let mut current = std::error::Error::source(self);
        while let Some(cause) = current {
            messages.push(cause.to_string());
            current = cause.source();
        }
        messages
    }
}
