//! Error types for the Wunderlist API client.
//!
//! # Design
//! Failures the caller can act on get their own variant: a stale revision is
//! always recoverable by re-reading and retrying, a missing record is reported
//! as `NotFound`, and everything else the server complains about lands in
//! `RemoteError` with the server's message kept verbatim. Transport failures
//! are carried as the source error without being retried or reworded.

use thiserror::Error;

/// Error type produced by a [`Transport`](crate::http::Transport).
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `WunderClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The caller passed an argument combination the operation cannot
    /// resolve. Raised before any request is issued.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The server rejected a write because the submitted revision is stale.
    #[error("revision conflict: {0}")]
    StaleRevision(String),

    /// The server or a lookup reported that the record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other error reported by the server.
    #[error("remote error (HTTP {status}): {message}")]
    RemoteError {
        status: u16,
        kind: Option<String>,
        message: String,
    },

    /// The HTTP round-trip itself failed.
    #[error(transparent)]
    TransportError(TransportError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(#[source] serde_json::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(#[source] serde_json::Error),

    /// A credential was expected in the environment but not set.
    #[error("missing credential: environment variable {var} is not set")]
    MissingCredential { var: &'static str },
}

impl ApiError {
    /// Whether re-reading the resource and retrying can resolve the error.
    pub fn is_stale_revision(&self) -> bool {
        matches!(self, ApiError::StaleRevision(_))
    }
}
