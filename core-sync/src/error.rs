use bridge_traits::error::BridgeError;
use provider_remote::RemoteError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] core_runtime::Error),

    #[error("Remote service error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Filesystem watcher error: {0}")]
    Watcher(#[from] BridgeError),

    #[error("Mode '{mode}' does not support {operation}")]
    UnsupportedMode {
        mode: &'static str,
        operation: &'static str,
    },

    #[error("Unknown sync mode: {0}")]
    UnknownMode(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
