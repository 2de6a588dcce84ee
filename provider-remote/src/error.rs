//! Error types for the remote provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Remote provider errors
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The service answered with a client or server error status
    #[error("Remote operation {operation} failed (status {status}): {body}")]
    OperationFailed {
        operation: &'static str,
        status: u16,
        body: serde_json::Value,
    },

    /// The request never produced a response
    #[error("Transport error during {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: BridgeError,
    },

    /// The request body could not be encoded; nothing was sent
    #[error("Failed to encode {operation} request: {message}")]
    Encode {
        operation: &'static str,
        message: String,
    },

    /// Failed to parse API response
    #[error("Failed to parse {operation} response: {message}")]
    Parse {
        operation: &'static str,
        message: String,
    },
}

impl RemoteError {
    /// HTTP status of a failed operation, if the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::OperationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Result type for remote operations
pub type Result<T> = std::result::Result<T, RemoteError>;
