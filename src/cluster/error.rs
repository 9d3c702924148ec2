//! Control-plane client error types.

use std::io;
use thiserror::Error;

/// Result type for control-plane calls.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Errors that can occur while fetching control-plane metadata.
#[derive(Error, Debug)]
pub enum ClusterError {
    /// Failed to spawn the agent process.
    #[error("failed to spawn agent process: {0}")]
    SpawnFailed(#[source] io::Error),

    /// Failed to start the runtime that drives the agent connection.
    #[error("failed to start agent runtime: {0}")]
    RuntimeFailed(#[source] io::Error),

    /// Failed to write to agent stdin.
    #[error("failed to write to agent: {0}")]
    WriteFailed(#[source] io::Error),

    /// Failed to read from the agent or a snapshot file.
    #[error("failed to read cluster metadata: {0}")]
    ReadFailed(#[source] io::Error),

    /// Failed to serialize request to JSON.
    #[error("failed to serialize request: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    /// Failed to deserialize a response or snapshot.
    #[error("failed to deserialize cluster metadata: {0}")]
    DeserializeFailed(#[source] serde_json::Error),

    /// Request timed out waiting for response.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Agent process exited unexpectedly.
    #[error("agent process exited unexpectedly")]
    AgentExited,

    /// Response channel was closed (internal error).
    #[error("response channel closed unexpectedly")]
    ChannelClosed,

    /// The control plane returned an error.
    #[error("control plane error: {message} (code: {code})")]
    Remote {
        /// Error code reported by the control plane.
        code: String,
        /// Error message reported by the control plane.
        message: String,
    },

    /// A requested resource does not exist.
    #[error("no such {kind}: {name}")]
    NotFound { kind: &'static str, name: String },
}

impl ClusterError {
    /// Create a remote error from an error response.
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for ClusterError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        Self::ChannelClosed
    }
}
