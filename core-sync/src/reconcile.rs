//! # Reconciliation
//!
//! Startup modes that decide how the remote service is brought in line with
//! the filesystem before, or instead of, steady-state watching.
//!
//! | Mode     | Gate at start | Watches | Remote effect                          |
//! |----------|---------------|---------|----------------------------------------|
//! | watch    | closed        | yes     | only changes after the initial scan    |
//! | backfill | open          | yes     | re-sends every existing entity         |
//! | purge    | n/a           | no      | removes every playlist and soundboard  |
//! | view     | n/a           | no      | none (read-only listing)               |

use provider_remote::{RemoteClient, RemotePlaylist, RemoteSoundboard};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::error::{Result, SyncError};
use crate::gate::ActivationGate;

/// Startup mode selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Watch,
    Backfill,
    Purge,
    View,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Watch => "watch",
            Self::Backfill => "backfill",
            Self::Purge => "purge",
            Self::View => "view",
        }
    }

    /// Whether this mode subscribes to the filesystem
    pub fn watches_filesystem(&self) -> bool {
        matches!(self, Self::Watch | Self::Backfill)
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncMode {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "watch" => Ok(Self::Watch),
            "backfill" => Ok(Self::Backfill),
            "purge" => Ok(Self::Purge),
            "view" => Ok(Self::View),
            other => Err(SyncError::UnknownMode(other.to_string())),
        }
    }
}

/// Outcome of a purge run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub playlists_removed: usize,
    pub soundboards_removed: usize,
    /// Removals that failed and were skipped
    pub failures: usize,
}

impl PurgeReport {
    pub fn removed(&self) -> usize {
        self.playlists_removed + self.soundboards_removed
    }
}

/// Remote collections as listed by `view`
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct RemoteSnapshot {
    pub playlists: Vec<RemotePlaylist>,
    pub soundboards: Vec<RemoteSoundboard>,
}

impl RemoteSnapshot {
    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty() && self.soundboards.is_empty()
    }
}

enum Removal<'a> {
    Playlist(&'a str),
    Soundboard(&'a str),
}

/// Runs the startup side of each [`SyncMode`].
pub struct ReconciliationController {
    client: Arc<dyn RemoteClient>,
    purge_delay: Duration,
}

impl ReconciliationController {
    pub fn new(client: Arc<dyn RemoteClient>, purge_delay: Duration) -> Self {
        Self {
            client,
            purge_delay,
        }
    }

    /// Initial gate for a watching mode.
    ///
    /// # Errors
    ///
    /// [`SyncError::UnsupportedMode`] for purge and view, which never watch.
    pub fn prepare_gate(&self, mode: SyncMode) -> Result<ActivationGate> {
        match mode {
            SyncMode::Watch => {
                info!("Watch mode: existing files are ignored until the initial scan completes");
                Ok(ActivationGate::inactive())
            }
            SyncMode::Backfill => {
                info!("Backfill mode: existing files will be re-sent to the remote service");
                Ok(ActivationGate::active())
            }
            SyncMode::Purge | SyncMode::View => Err(SyncError::UnsupportedMode {
                mode: mode.as_str(),
                operation: "filesystem watching",
            }),
        }
    }

    /// Removes every remote playlist, then every remote soundboard, pausing
    /// `purge_delay` between consecutive removals.
    ///
    /// # Errors
    ///
    /// Fails only if either listing call fails. Individual removal failures
    /// are logged, counted in the report and skipped.
    #[instrument(skip(self), fields(delay_ms = self.purge_delay.as_millis() as u64))]
    pub async fn purge(&self) -> Result<PurgeReport> {
        let playlists = self.client.list_playlists().await?;
        let soundboards = self.client.list_soundboards().await?;

        info!(
            playlists = playlists.len(),
            soundboards = soundboards.len(),
            "Purging remote collections"
        );

        let removals = playlists
            .iter()
            .map(|p| Removal::Playlist(&p.url))
            .chain(soundboards.iter().map(|s| Removal::Soundboard(&s.url)));

        let mut report = PurgeReport::default();

        for (index, removal) in removals.enumerate() {
            if index > 0 && !self.purge_delay.is_zero() {
                tokio::time::sleep(self.purge_delay).await;
            }

            match removal {
                Removal::Playlist(url) => match self.client.remove_playlist(url).await {
                    Ok(()) => {
                        report.playlists_removed += 1;
                        info!(url, "Removed playlist");
                    }
                    Err(e) => {
                        report.failures += 1;
                        warn!(url, error = %e, "Failed to remove playlist");
                    }
                },
                Removal::Soundboard(url) => match self.client.remove_soundboard(url).await {
                    Ok(()) => {
                        report.soundboards_removed += 1;
                        info!(url, "Removed soundboard");
                    }
                    Err(e) => {
                        report.failures += 1;
                        warn!(url, error = %e, "Failed to remove soundboard");
                    }
                },
            }
        }

        info!(
            playlists_removed = report.playlists_removed,
            soundboards_removed = report.soundboards_removed,
            failures = report.failures,
            "Purge complete"
        );

        Ok(report)
    }

    /// Lists remote playlists and soundboards without changing anything.
    #[instrument(skip(self))]
    pub async fn view(&self) -> Result<RemoteSnapshot> {
        let playlists = self.client.list_playlists().await?;
        let soundboards = self.client.list_soundboards().await?;

        Ok(RemoteSnapshot {
            playlists,
            soundboards,
        })
    }
}
