//! # Folder Sync Core
//!
//! Keeps a remote media-control service in step with a local directory
//! tree.
//!
//! ## Overview
//!
//! ```text
//! FileWatcher -> WatchSupervisor -> EventQueue -> PathClassifier -> RemoteClient
//!                                       ^
//!                         ActivationGate (set by mode / readiness)
//! ```
//!
//! ## Components
//!
//! - **Path Classifier** (`classifier`): Maps paths to playlists, tracks, soundboards and sounds
//! - **Activation Gate** (`gate`): Suppresses remote calls until the initial scan is done
//! - **Remote Operations** (`operation`): Event kind x target to a single remote call
//! - **Event Queue** (`queue`): FIFO buffer drained one event per tick
//! - **Reconciliation** (`reconcile`): Watch, backfill, purge and view modes
//! - **Watch Supervisor** (`supervisor`): Forwards watcher signals into the queue

pub mod classifier;
pub mod error;
pub mod gate;
pub mod operation;
pub mod queue;
pub mod reconcile;
pub mod supervisor;

pub use classifier::{ClassifiedTarget, PathClassifier, UNKNOWN_TITLE};
pub use error::{Result, SyncError};
pub use gate::ActivationGate;
pub use operation::RemoteOperation;
pub use queue::{DiscardReason, EventQueue, QueueStats, TickOutcome};
pub use reconcile::{PurgeReport, ReconciliationController, RemoteSnapshot, SyncMode};
pub use supervisor::WatchSupervisor;
