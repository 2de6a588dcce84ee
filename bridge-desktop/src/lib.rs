//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `FileWatcher` using `notify` for live events and `walkdir` for the
//!   initial scan
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{NotifyWatcher, ReqwestHttpClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let http_client = Arc::new(ReqwestHttpClient::new()?);
//!     let watcher = Arc::new(NotifyWatcher::new());
//!
//!     // Hand both to the sync service
//!     Ok(())
//! }
//! ```

mod http;
mod watcher;

pub use http::ReqwestHttpClient;
pub use watcher::NotifyWatcher;
