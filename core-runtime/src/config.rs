//! # Sync Configuration Module
//!
//! Provides the immutable, per-run configuration of the folder sync core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `SyncConfig`
//! instance. It enforces fail-fast validation so that a bad directory layout
//! or endpoint is reported before any watcher or remote call is set up.
//!
//! ## Directory layout
//!
//! ```text
//! <root>/
//!   Playlists/<playlist>/<track file>
//!   Soundboards/<soundboard>/<sound file>
//! ```
//!
//! Both subdirectory names are configurable and must be distinct.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::SyncConfig;
//!
//! let config = SyncConfig::builder()
//!     .root("/srv/media")
//!     .host("192.168.1.20")
//!     .port(3333)
//!     .build()
//!     .expect("valid configuration");
//!
//! assert_eq!(config.endpoint.base_url(), "http://192.168.1.20:3333/v1");
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::SyncConfig;
//!
//! // Identical subdirectory names make classification ambiguous
//! let config = SyncConfig::builder()
//!     .root("/srv/media")
//!     .playlists_dir("Media")
//!     .soundboards_dir("Media")
//!     .build()
//!     .expect("Should fail - duplicate directory names");
//! ```

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default name of the playlists subdirectory
pub const DEFAULT_PLAYLISTS_DIR: &str = "Playlists";

/// Default name of the soundboards subdirectory
pub const DEFAULT_SOUNDBOARDS_DIR: &str = "Soundboards";

/// Default remote host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default remote port
pub const DEFAULT_PORT: u16 = 3333;

/// Default interval between queue worker ticks
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Default pause between removals during a purge
pub const DEFAULT_PURGE_DELAY: Duration = Duration::from_millis(500);

/// Default timeout applied to each remote request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for the purge delay
const MAX_PURGE_DELAY: Duration = Duration::from_secs(60);

/// Root directory plus the names of its two managed subdirectories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLayout {
    root: PathBuf,
    playlists_dir: String,
    soundboards_dir: String,
}

impl DirectoryLayout {
    /// Layout with the default `Playlists` / `Soundboards` names.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_names(root, DEFAULT_PLAYLISTS_DIR, DEFAULT_SOUNDBOARDS_DIR)
    }

    /// Layout with custom subdirectory names.
    pub fn with_names(
        root: impl Into<PathBuf>,
        playlists_dir: impl Into<String>,
        soundboards_dir: impl Into<String>,
    ) -> Result<Self> {
        let layout = Self {
            root: root.into(),
            playlists_dir: playlists_dir.into(),
            soundboards_dir: soundboards_dir.into(),
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Validates the layout.
    ///
    /// This checks:
    /// - Root is a non-empty absolute path
    /// - Both subdirectory names are single, non-blank path segments
    /// - The two names differ
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(Error::Config("Root directory cannot be empty".to_string()));
        }

        if !self.root.is_absolute() {
            return Err(Error::Config(format!(
                "Root directory must be an absolute path, got {}",
                self.root.display()
            )));
        }

        validate_dir_name("Playlists directory", &self.playlists_dir)?;
        validate_dir_name("Soundboards directory", &self.soundboards_dir)?;

        if self.playlists_dir == self.soundboards_dir {
            return Err(Error::Config(format!(
                "Playlists and soundboards directories must differ (both are '{}')",
                self.playlists_dir
            )));
        }

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn playlists_dir(&self) -> &str {
        &self.playlists_dir
    }

    pub fn soundboards_dir(&self) -> &str {
        &self.soundboards_dir
    }

    /// Absolute path of the playlists subdirectory
    pub fn playlists_path(&self) -> PathBuf {
        self.root.join(&self.playlists_dir)
    }

    /// Absolute path of the soundboards subdirectory
    pub fn soundboards_path(&self) -> PathBuf {
        self.root.join(&self.soundboards_dir)
    }
}

fn validate_dir_name(label: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Config(format!("{} name cannot be empty", label)));
    }

    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(Error::Config(format!(
            "{} name must be a single directory name, got '{}'",
            label, name
        )));
    }

    Ok(())
}

/// The single remote service instance targeted by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoint {
    host: String,
    port: u16,
}

impl RemoteEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let endpoint = Self {
            host: host.into(),
            port,
        };
        endpoint.validate()?;
        Ok(endpoint)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("Remote host cannot be empty".to_string()));
        }

        if self.port == 0 {
            return Err(Error::Config("Remote port must be non-zero".to_string()));
        }

        Ok(())
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base URL of the versioned API, e.g. `http://127.0.0.1:3333/v1`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/v1", self.host, self.port)
    }
}

impl Default for RemoteEndpoint {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Configuration for one run of the sync core.
///
/// Use [`SyncConfigBuilder`] to construct instances.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Watched directory layout; absent for remote-only runs (purge, view)
    pub layout: Option<DirectoryLayout>,

    /// Remote service address
    pub endpoint: RemoteEndpoint,

    /// Interval between queue worker ticks
    pub tick_interval: Duration,

    /// Pause between consecutive removals during a purge
    pub purge_delay: Duration,

    /// Timeout applied to each remote request
    pub request_timeout: Duration,

    /// Cap on concurrently in-flight remote calls from the queue (`None` = unbounded)
    pub max_in_flight: Option<usize>,
}

impl SyncConfig {
    /// Creates a new builder for constructing a `SyncConfig`.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if let Some(layout) = &self.layout {
            layout.validate()?;
        }

        self.endpoint.validate()?;

        if self.tick_interval.is_zero() {
            return Err(Error::Config(
                "Queue tick interval must be greater than 0ms".to_string(),
            ));
        }

        if self.purge_delay > MAX_PURGE_DELAY {
            return Err(Error::Config(
                "Purge delay exceeds maximum of 60 seconds".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than 0ms".to_string(),
            ));
        }

        if self.max_in_flight == Some(0) {
            return Err(Error::Config(
                "In-flight limit must be at least 1 when set".to_string(),
            ));
        }

        Ok(())
    }

    /// The directory layout, required by the watching modes.
    pub fn require_layout(&self) -> Result<&DirectoryLayout> {
        self.layout.as_ref().ok_or_else(|| {
            Error::Config("Root directory is required. Use .root() to set it.".to_string())
        })
    }
}

/// Builder for constructing [`SyncConfig`] instances.
#[derive(Debug, Default)]
pub struct SyncConfigBuilder {
    root: Option<PathBuf>,
    playlists_dir: Option<String>,
    soundboards_dir: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    tick_interval: Option<Duration>,
    purge_delay: Option<Duration>,
    request_timeout: Option<Duration>,
    max_in_flight: Option<usize>,
}

impl SyncConfigBuilder {
    /// Sets the watched root directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::SyncConfig;
    ///
    /// let builder = SyncConfig::builder().root("/srv/media");
    /// ```
    pub fn root<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the playlists subdirectory name.
    ///
    /// Default: `Playlists`
    pub fn playlists_dir(mut self, name: impl Into<String>) -> Self {
        self.playlists_dir = Some(name.into());
        self
    }

    /// Sets the soundboards subdirectory name.
    ///
    /// Default: `Soundboards`
    pub fn soundboards_dir(mut self, name: impl Into<String>) -> Self {
        self.soundboards_dir = Some(name.into());
        self
    }

    /// Sets the remote host.
    ///
    /// Default: `127.0.0.1`
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the remote port.
    ///
    /// Default: 3333
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the queue worker tick interval.
    ///
    /// Default: 250ms
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = Some(interval);
        self
    }

    /// Sets the pause between removals during a purge.
    ///
    /// Default: 500ms
    pub fn purge_delay(mut self, delay: Duration) -> Self {
        self.purge_delay = Some(delay);
        self
    }

    /// Sets the per-request timeout.
    ///
    /// Default: 30s
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Caps the number of remote calls the queue keeps in flight.
    pub fn max_in_flight(mut self, limit: usize) -> Self {
        self.max_in_flight = Some(limit);
        self
    }

    /// Builds the final `SyncConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when any value is invalid. A missing root is
    /// not an error here; modes that need it call
    /// [`SyncConfig::require_layout`].
    pub fn build(self) -> Result<SyncConfig> {
        let layout = self
            .root
            .map(|root| {
                DirectoryLayout::with_names(
                    root,
                    self.playlists_dir
                        .unwrap_or_else(|| DEFAULT_PLAYLISTS_DIR.to_string()),
                    self.soundboards_dir
                        .unwrap_or_else(|| DEFAULT_SOUNDBOARDS_DIR.to_string()),
                )
            })
            .transpose()?;

        let endpoint = RemoteEndpoint::new(
            self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            self.port.unwrap_or(DEFAULT_PORT),
        )?;

        let config = SyncConfig {
            layout,
            endpoint,
            tick_interval: self.tick_interval.unwrap_or(DEFAULT_TICK_INTERVAL),
            purge_delay: self.purge_delay.unwrap_or(DEFAULT_PURGE_DELAY),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            max_in_flight: self.max_in_flight,
        };

        config.validate()?;

        Ok(config)
    }
}
