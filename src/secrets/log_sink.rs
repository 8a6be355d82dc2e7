//! Structured failure log for secret retrieval.
//!
//! Every failed fetch produces exactly one [`LogEntry`], written synchronously
//! to the [`LogSink`] injected into the retriever. The sink is owned by the
//! caller: route entries into `tracing` ([`TracingLogSink`]), append them to a
//! JSON-lines file ([`FileLogSink`]) or collect them ([`MemoryLogSink`]).
//!
//! Entries carry the secret identifier and error chain, never secret values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

use super::error::SecretsError;

/// Default component name stamped on entries.
pub const DEFAULT_COMPONENT: &str = "AWSSecretsManager";

/// Severity of a log entry. Retrieval failures are always `ERROR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields stamped on every entry a retriever writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFields {
    /// Component name (e.g. `AWSSecretsManager`)
    pub component: String,
    /// Deployment environment tag
    pub environment: String,
}

impl LogFields {
    pub fn new(component: impl Into<String>, environment: impl Into<String>) -> Self {
        Self { component: component.into(), environment: environment.into() }
    }
}

impl Default for LogFields {
    fn default() -> Self {
        Self::new(DEFAULT_COMPONENT, "development")
    }
}

/// One structured log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub component: String,
    pub environment: String,
    pub severity: Severity,
    /// Identifier shared by everything logged for one fetch
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Stable error kind, e.g. `client_construction`
    pub kind: String,
    pub secret_id: Option<String>,
    pub message: String,
    /// Messages of the error's causes, outermost first (excluding `message`)
    #[serde(default)]
    pub causes: Vec<String>,
    /// Stack trace captured where the entry was built; `None` only on
    /// platforms without backtrace support
    pub backtrace: Option<String>,
}

impl LogEntry {
    /// Build an `ERROR` entry describing `error`.
    pub fn error(fields: &LogFields, request_id: Uuid, error: &SecretsError) -> Self {
        let mut chain = error.chain().into_iter();
        let message = chain.next().unwrap_or_default();
        let backtrace = Backtrace::force_capture();

        Self {
            component: fields.component.clone(),
            environment: fields.environment.clone(),
            severity: Severity::Error,
            request_id,
            timestamp: Utc::now(),
            kind: error.kind().to_string(),
            secret_id: None,
            message,
            causes: chain.collect(),
            backtrace: match backtrace.status() {
                BacktraceStatus::Captured => Some(backtrace.to_string()),
                _ => None,
            },
        }
    }

    pub fn with_secret_id(mut self, secret_id: impl Into<String>) -> Self {
        self.secret_id = Some(secret_id.into());
        self
    }
}

/// Errors a sink can report when it fails to accept an entry.
#[derive(Error, Debug)]
pub enum LogSinkError {
    #[error("failed to write log entry: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode log entry: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("log sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for structured log entries.
///
/// `write` must be synchronous: the entry is persisted (or handed off) before
/// it returns.
pub trait LogSink: Send + Sync + fmt::Debug {
    fn write(&self, entry: &LogEntry) -> Result<(), LogSinkError>;
}

impl<T: LogSink + ?Sized> LogSink for Arc<T> {
    fn write(&self, entry: &LogEntry) -> Result<(), LogSinkError> {
        (**self).write(entry)
    }
}

/// Forwards entries to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn write(&self, entry: &LogEntry) -> Result<(), LogSinkError> {
        match entry.severity {
            Severity::Error => tracing::error!(
                component = %entry.component,
                environment = %entry.environment,
                request_id = %entry.request_id,
                kind = %entry.kind,
                secret_id = entry.secret_id.as_deref().unwrap_or(""),
                causes = ?entry.causes,
                backtrace = entry.backtrace.as_deref().unwrap_or(""),
                "{}",
                entry.message
            ),
        }
        Ok(())
    }
}

/// Appends entries as JSON lines to a file.
#[derive(Debug)]
pub struct FileLogSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileLogSink {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LogSinkError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file: Mutex::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileLogSink {
    fn write(&self, entry: &LogEntry) -> Result<(), LogSinkError> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let mut file = self
            .file
            .lock()
            .map_err(|_| LogSinkError::Unavailable(format!("{} lock poisoned", self.path.display())))?;
        file.write_all(&line)?;
        file.flush()?;
        Ok(())
    }
}

/// Keeps entries in memory. Useful for tests and for callers that batch entries elsewhere.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the entries written so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|entries| entries.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemoryLogSink {
    fn write(&self, entry: &LogEntry) -> Result<(), LogSinkError> {
        self.entries
            .lock()
            .map_err(|_| LogSinkError::Unavailable("memory sink lock poisoned".to_string()))?
            .push(entry.clone());
        Ok(())
    }
}
