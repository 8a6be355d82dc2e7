//! Secret payload types.
//!
//! [`SecretValue`] is what a successful `GetSecretValue` call hands back. The
//! retriever forwards it untouched; only the string form is wrapped in
//! [`SecretString`] so it cannot leak through logging or serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string whose contents are redacted in Debug, Display and serialization.
///
/// The memory is zeroed on drop. Call [`SecretString::expose_secret`] to read it.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Borrow the underlying value. Never log the result.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Payload of a successful `GetSecretValue` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretValue {
    /// Friendly name of the secret
    pub name: Option<String>,
    /// Full ARN of the secret
    pub arn: Option<String>,
    /// Identifier of the returned version
    pub version_id: Option<String>,
    /// Staging labels attached to the returned version
    #[serde(default)]
    pub version_stages: Vec<String>,
    /// Text form of the secret, if it was stored as a string
    pub secret_string: Option<SecretString>,
    /// Binary form of the secret, if it was stored as bytes
    #[serde(skip_serializing)]
    pub secret_binary: Option<Vec<u8>>,
    /// When this version was created
    pub created_date: Option<DateTime<Utc>>,
}

impl SecretValue {
    /// A payload holding only a string secret.
    pub fn from_string(secret: impl Into<String>) -> Self {
        Self { secret_string: Some(SecretString::new(secret)), ..Default::default() }
    }

    /// A payload holding only a binary secret.
    pub fn from_binary(secret: impl Into<Vec<u8>>) -> Self {
        Self { secret_binary: Some(secret.into()), ..Default::default() }
    }

    /// Set the secret name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the version id and its staging labels.
    pub fn with_version(mut self, version_id: impl Into<String>, stages: Vec<String>) -> Self {
        self.version_id = Some(version_id.into());
        self.version_stages = stages;
        self
    }

    /// The string secret, if any.
    pub fn secret_str(&self) -> Option<&str> {
        self.secret_string.as_ref().map(SecretString::expose_secret)
    }
}
