//! Bridges the filesystem watcher into the event queue.

use bridge_traits::watcher::{FileWatcher, WatchSignal};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::queue::EventQueue;

/// Owns the watch subscription for one root.
///
/// Every event is forwarded to the queue. The watcher's readiness signal
/// becomes an activation marker behind the events already queued, so the
/// gate opens in stream order. An already open gate needs no marker. Watcher errors are logged and otherwise
/// ignored.
pub struct WatchSupervisor {
    watcher: Arc<dyn FileWatcher>,
    queue: Arc<EventQueue>,
}

impl WatchSupervisor {
    pub fn new(watcher: Arc<dyn FileWatcher>, queue: Arc<EventQueue>) -> Self {
        Self { watcher, queue }
    }

    /// Forwards signals until `shutdown` is cancelled or the watcher closes
    /// its channel, then unsubscribes.
    ///
    /// # Errors
    ///
    /// Fails only if the subscription cannot be established.
    #[instrument(skip(self, shutdown), fields(root = %root.display()))]
    pub async fn run(&self, root: &Path, shutdown: CancellationToken) -> Result<()> {
        let mut signals = self.watcher.watch(root).await?;
        info!("Watching for filesystem changes");

        loop {
            let signal = tokio::select! {
                _ = shutdown.cancelled() => break,
                signal = signals.recv() => signal,
            };

            match signal {
                Some(WatchSignal::Event(event)) => self.queue.enqueue(event).await,
                Some(WatchSignal::Ready) if self.queue.gate().is_active() => {
                    debug!("Initial scan complete");
                }
                Some(WatchSignal::Ready) => {
                    info!("Initial scan complete, activating after queued scan events");
                    self.queue.enqueue_activation().await;
                }
                Some(WatchSignal::Error(message)) => {
                    warn!(error = %message, "Filesystem watcher error");
                }
                None => {
                    warn!("Watcher channel closed");
                    break;
                }
            }
        }

        if let Err(e) = self.watcher.unwatch(root).await {
            warn!(error = %e, "Failed to stop watcher");
        }

        info!("Stopped watching");
        Ok(())
    }
}
