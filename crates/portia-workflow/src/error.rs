//! Error types for the workflow crate
//!
//! Rename and transport failures are recovered inside the coordinator and
//! surfaced as notifications; they show up here so callers and tests can
//! inspect what happened.

use crate::validate::INVALID_NAME_MESSAGE;

/// Reasons a rename was abandoned before any request was sent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenameError {
    /// Name fails the allowed character set
    #[error("{}", INVALID_NAME_MESSAGE)]
    InvalidName { name: String },

    /// Another rename of the same spider is still awaiting confirmation
    #[error("a rename of spider '{id}' is already in progress")]
    RenamePending { id: String },

    /// Spider has no server id or no project, so it has no rename endpoint
    #[error("spider has not been saved to a project yet")]
    MissingIdentity,
}

/// Failures of the confirming request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Server answered with a non-success status
    #[error("server returned status {code}: {body}")]
    Status { code: u16, body: String },

    /// Request never produced a response
    #[error("request failed: {0}")]
    Request(String),

    /// Response body was not valid JSON
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Blocking worker panicked or was cancelled
    #[error("transport worker failed: {0}")]
    Worker(String),
}

impl TransportError {
    /// Check if the server rejected the request (as opposed to never seeing it)
    #[inline]
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Status { .. })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
