//! `GetSecretValue` request.

/// Version stage requested on every fetch: the current revision of the secret.
pub const VERSION_STAGE_CURRENT: &str = "AWSCURRENT";

/// Request for a single secret value. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetSecretValueRequest {
    secret_id: String,
    version_stage: &'static str,
}

impl GetSecretValueRequest {
    /// Request the `AWSCURRENT` version of `secret_id` (a name or an ARN).
    pub fn current(secret_id: impl Into<String>) -> Self {
        Self { secret_id: secret_id.into(), version_stage: VERSION_STAGE_CURRENT }
    }

    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }

    pub fn version_stage(&self) -> &str {
        self.version_stage
    }
}
