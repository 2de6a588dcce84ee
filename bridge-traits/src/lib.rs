//! # Host Bridge Traits
//!
//! Platform abstraction traits the sync core depends on.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - One request/response round trip against the remote API
//! - [`FileWatcher`](watcher::FileWatcher) - Filesystem mutation events plus an initial-scan
//!   readiness signal
//!
//! Desktop implementations live in `bridge-desktop`. Tests substitute mocks.
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform errors into it and include context (URL, path).
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so handles can be shared across
//! spawned tasks.

pub mod error;
pub mod http;
pub mod watcher;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use watcher::{FileWatcher, FilesystemEvent, WatchReceiver, WatchSignal};
