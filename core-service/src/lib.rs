//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP transport and
//! filesystem watcher) into the sync core and runs one [`SyncMode`] to
//! completion. Desktop hosts typically enable the `desktop-shims` feature
//! (which depends on `bridge-desktop`) and call [`bootstrap_desktop`].

pub mod error;

pub use error::{CoreError, Result};

pub use core_sync::{PurgeReport, QueueStats, RemoteSnapshot, SyncMode};

use std::sync::Arc;

use bridge_traits::{http::HttpClient, watcher::FileWatcher};
use core_runtime::config::SyncConfig;
use core_sync::{EventQueue, PathClassifier, ReconciliationController, WatchSupervisor};
use provider_remote::{HttpRemoteClient, RemoteClient};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// Aggregated handle to all bridge dependencies the core requires.
pub struct SyncDependencies {
    pub http_client: Arc<dyn HttpClient>,
    pub watcher: Arc<dyn FileWatcher>,
}

impl SyncDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(http_client: Arc<dyn HttpClient>, watcher: Arc<dyn FileWatcher>) -> Self {
        Self {
            http_client,
            watcher,
        }
    }

    /// Reqwest transport and notify watcher.
    #[cfg(feature = "desktop-shims")]
    pub fn desktop(config: &SyncConfig) -> Result<Self> {
        let http_client = bridge_desktop::ReqwestHttpClient::with_timeout(config.request_timeout)
            .map_err(|err| CoreError::InitializationFailed(err.to_string()))?;

        Ok(Self::new(
            Arc::new(http_client),
            Arc::new(bridge_desktop::NotifyWatcher::default()),
        ))
    }
}

/// What a finished run produced.
#[derive(Debug)]
pub enum RunSummary {
    /// Watch or backfill ended (shutdown or watcher closed)
    Watched(QueueStats),
    Purged(PurgeReport),
    Viewed(RemoteSnapshot),
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct SyncService {
    config: Arc<SyncConfig>,
    deps: Arc<SyncDependencies>,
    remote: Arc<dyn RemoteClient>,
}

impl SyncService {
    /// Create a new service talking HTTP to the configured endpoint.
    pub fn new(config: SyncConfig, deps: SyncDependencies) -> Result<Self> {
        let remote = HttpRemoteClient::new(
            Arc::clone(&deps.http_client),
            config.endpoint.base_url(),
        )
        .with_timeout(config.request_timeout);

        Self::with_remote_client(config, deps, Arc::new(remote))
    }

    /// Create a service around an explicit remote client.
    pub fn with_remote_client(
        config: SyncConfig,
        deps: SyncDependencies,
        remote: Arc<dyn RemoteClient>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config: Arc::new(config),
            deps: Arc::new(deps),
            remote,
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    fn controller(&self) -> ReconciliationController {
        ReconciliationController::new(Arc::clone(&self.remote), self.config.purge_delay)
    }

    /// Runs `mode` until it completes or `shutdown` is cancelled.
    ///
    /// Watch and backfill only return once `shutdown` fires or the watcher
    /// stops delivering. Events still queued at that point are dropped.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Config`] when a watching mode has no root directory
    /// - [`CoreError::Sync`] when the watcher cannot subscribe or a purge/view
    ///   listing fails
    /// - [`CoreError::Cancelled`] when a purge or view is interrupted
    #[instrument(skip(self, shutdown), fields(mode = %mode))]
    pub async fn run(&self, mode: SyncMode, shutdown: CancellationToken) -> Result<RunSummary> {
        match mode {
            SyncMode::Watch | SyncMode::Backfill => {
                self.watch(mode, shutdown).await.map(RunSummary::Watched)
            }
            SyncMode::Purge => {
                let controller = self.controller();
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => Err(CoreError::Cancelled),
                    report = controller.purge() => Ok(RunSummary::Purged(report?)),
                }
            }
            SyncMode::View => {
                let controller = self.controller();
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => Err(CoreError::Cancelled),
                    snapshot = controller.view() => Ok(RunSummary::Viewed(snapshot?)),
                }
            }
        }
    }

    async fn watch(&self, mode: SyncMode, shutdown: CancellationToken) -> Result<QueueStats> {
        let layout = self.config.require_layout()?.clone();
        let gate = self.controller().prepare_gate(mode)?;

        let queue = Arc::new(
            EventQueue::new(
                PathClassifier::new(layout.clone()),
                Arc::clone(&self.remote),
                gate,
            )
            .with_max_in_flight(self.config.max_in_flight),
        );

        let worker_token = shutdown.child_token();
        let worker = tokio::spawn({
            let queue = Arc::clone(&queue);
            let token = worker_token.clone();
            let interval = self.config.tick_interval;
            async move { queue.run(interval, token).await }
        });

        info!(
            root = %layout.root().display(),
            endpoint = %self.config.endpoint.base_url(),
            "Starting sync"
        );

        let supervisor = WatchSupervisor::new(Arc::clone(&self.deps.watcher), Arc::clone(&queue));
        let watched = supervisor.run(layout.root(), shutdown).await;

        worker_token.cancel();
        worker
            .await
            .map_err(|err| CoreError::Task(err.to_string()))?;
        watched?;

        Ok(queue.stats().await)
    }
}

/// Convenience bootstrapper for desktop hosts.
///
/// ```no_run
/// # async fn example() -> core_service::Result<()> {
/// use core_runtime::config::SyncConfig;
/// use core_service::{bootstrap_desktop, SyncMode};
/// use tokio_util::sync::CancellationToken;
///
/// let config = SyncConfig::builder().root("/srv/media").build()?;
/// let service = bootstrap_desktop(config)?;
/// service.run(SyncMode::Watch, CancellationToken::new()).await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(config: SyncConfig) -> Result<SyncService> {
    let deps = SyncDependencies::desktop(&config)?;
    SyncService::new(config, deps)
}
