//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the folder sync core:
//! - Logging and tracing infrastructure
//! - Configuration management (directory layout, remote endpoint, timings)
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that other modules depend on.
//! It establishes the logging conventions and the immutable per-run
//! configuration shared by the watcher, queue and reconciliation code.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{DirectoryLayout, RemoteEndpoint, SyncConfig, SyncConfigBuilder};
pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
