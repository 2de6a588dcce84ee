//! Filesystem Watcher Abstraction
//!
//! Describes the contract between the sync core and whatever notifies it of
//! filesystem mutations under a watched root.
//!
//! A watcher must:
//! - report the four mutation kinds with absolute paths
//! - replay every pre-existing entry under the root as an "added" event
//!   during its initial scan
//! - send [`WatchSignal::Ready`] exactly once, after that scan completes
//! - keep delivering events until [`FileWatcher::unwatch`] is called

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::error::Result;

/// A single filesystem mutation under the watched root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilesystemEvent {
    FileAdded(PathBuf),
    FileRemoved(PathBuf),
    DirectoryAdded(PathBuf),
    DirectoryRemoved(PathBuf),
}

impl FilesystemEvent {
    /// Path the event refers to
    pub fn path(&self) -> &Path {
        match self {
            Self::FileAdded(path)
            | Self::FileRemoved(path)
            | Self::DirectoryAdded(path)
            | Self::DirectoryRemoved(path) => path,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::DirectoryAdded(_) | Self::DirectoryRemoved(_))
    }

    /// Short label used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileAdded(_) => "add",
            Self::FileRemoved(_) => "unlink",
            Self::DirectoryAdded(_) => "addDir",
            Self::DirectoryRemoved(_) => "unlinkDir",
        }
    }
}

/// Everything a watch subscription can yield.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchSignal {
    /// A filesystem mutation
    Event(FilesystemEvent),
    /// The initial scan of the root has completed
    Ready,
    /// A non-fatal watcher failure
    Error(String),
}

/// Receiving half of a watch subscription
pub type WatchReceiver = mpsc::UnboundedReceiver<WatchSignal>;

/// Filesystem watcher trait
///
/// # Example
///
/// ```ignore
/// use bridge_traits::watcher::{FileWatcher, WatchSignal};
///
/// async fn drain(watcher: &dyn FileWatcher, root: &Path) -> Result<()> {
///     let mut signals = watcher.watch(root).await?;
///     while let Some(signal) = signals.recv().await {
///         if signal == WatchSignal::Ready {
///             break;
///         }
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait FileWatcher: Send + Sync {
    /// Start watching `root` recursively.
    ///
    /// # Errors
    ///
    /// Returns error if the root does not exist or the platform watcher
    /// cannot be registered.
    async fn watch(&self, root: &Path) -> Result<WatchReceiver>;

    /// Stop watching `root`. Unknown roots are a no-op.
    async fn unwatch(&self, root: &Path) -> Result<()>;
}
