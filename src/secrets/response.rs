//! The single message delivered per fetch.

use super::error::SecretsError;
use super::types::SecretValue;

/// Result of one fetch: exactly one of `data` and `error` is present.
///
/// Backed by a `Result`, so a response can never carry both or neither.
#[derive(Debug)]
pub struct SecretsManagerResponse {
    outcome: Result<SecretValue, SecretsError>,
}

impl SecretsManagerResponse {
    pub fn success(data: SecretValue) -> Self {
        Self { outcome: Ok(data) }
    }

    pub fn failure(error: SecretsError) -> Self {
        Self { outcome: Err(error) }
    }

    pub fn data(&self) -> Option<&SecretValue> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&SecretsError> {
        self.outcome.as_ref().err()
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Convert into a `Result`, consuming the response.
    pub fn into_result(self) -> Result<SecretValue, SecretsError> {
        self.outcome
    }
}

impl From<Result<SecretValue, SecretsError>> for SecretsManagerResponse {
    fn from(result: Result<SecretValue, SecretsError>) -> Self {
        Self { outcome: result }
    }
}
