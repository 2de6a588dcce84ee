//! # Event Queue
//!
//! Serializes filesystem events into remote calls.
//!
//! ## Overview
//!
//! Events are appended at the tail by the watch supervisor and removed from
//! the head by a single periodic worker, one per tick. Each tick:
//!
//! 1. checks the [`ActivationGate`]; a closed gate discards the event
//! 2. classifies the path; an inapplicable path discards the event
//! 3. spawns one task for the planned [`RemoteOperation`] and returns without
//!    awaiting it
//!
//! The watcher's readiness signal travels through the queue as an activation
//! marker ([`EventQueue::enqueue_activation`]). The gate opens when the marker
//! reaches the head, so scan events still pending at that point are discarded
//! rather than replayed.
//!
//! Dequeue order is strict FIFO. Completion order of the spawned calls is not
//! guaranteed. Failed calls are logged and dropped; nothing is retried or
//! re-enqueued.
//!
//! ## Bounded Concurrency
//!
//! With [`EventQueue::with_max_in_flight`], a tick that finds every permit in
//! use leaves the head event in place and reports
//! [`TickOutcome::Saturated`].
//!
//! ## Usage
//!
//! ```ignore
//! use core_sync::{ActivationGate, EventQueue, PathClassifier};
//!
//! let queue = Arc::new(EventQueue::new(classifier, client, ActivationGate::inactive()));
//! let worker = tokio::spawn({
//!     let queue = Arc::clone(&queue);
//!     async move { queue.run(Duration::from_millis(250), shutdown).await }
//! });
//! queue.enqueue(event).await;
//! ```

use bridge_traits::watcher::FilesystemEvent;
use provider_remote::RemoteClient;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, trace, warn, Instrument};

use crate::classifier::PathClassifier;
use crate::gate::ActivationGate;
use crate::operation::RemoteOperation;

/// Why a dequeued event produced no remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The activation gate was closed
    Inactive,
    /// The path does not fit the directory grammar
    NotApplicable,
}

/// Result of a single worker tick
#[derive(Debug)]
pub enum TickOutcome {
    /// Nothing was pending
    Idle,
    /// An activation marker was dequeued; `changed` is false if the gate was
    /// already open
    Activated { changed: bool },
    /// The in-flight limit is reached; the head event stays queued
    Saturated,
    /// The head event was dequeued and dropped
    Discarded {
        event: FilesystemEvent,
        reason: DiscardReason,
    },
    /// The head event was dequeued and its remote call spawned
    Dispatched {
        operation: RemoteOperation,
        handle: JoinHandle<()>,
    },
}

/// Snapshot of queue counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    /// Events waiting to be dequeued
    pub pending: usize,
    pub enqueued: u64,
    pub dequeued: u64,
    pub discarded_inactive: u64,
    pub discarded_not_applicable: u64,
    pub dispatched: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Remote calls spawned but not yet finished
    pub in_flight: usize,
}

#[derive(Debug)]
enum Entry {
    Event(FilesystemEvent),
    Activate,
}

#[derive(Debug, Default)]
struct Counters {
    enqueued: AtomicU64,
    dequeued: AtomicU64,
    discarded_inactive: AtomicU64,
    discarded_not_applicable: AtomicU64,
    dispatched: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    in_flight: AtomicUsize,
}

/// FIFO buffer of filesystem events drained by a periodic worker.
pub struct EventQueue {
    pending: Mutex<VecDeque<Entry>>,
    classifier: PathClassifier,
    client: Arc<dyn RemoteClient>,
    gate: ActivationGate,
    limiter: Option<Arc<Semaphore>>,
    counters: Arc<Counters>,
}

impl EventQueue {
    pub fn new(
        classifier: PathClassifier,
        client: Arc<dyn RemoteClient>,
        gate: ActivationGate,
    ) -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            classifier,
            client,
            gate,
            limiter: None,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Caps concurrently running remote calls. `None` leaves them unbounded.
    pub fn with_max_in_flight(mut self, limit: Option<usize>) -> Self {
        self.limiter = limit.map(|permits| Arc::new(Semaphore::new(permits)));
        self
    }

    /// Handle to the gate this queue consults on dequeue
    pub fn gate(&self) -> &ActivationGate {
        &self.gate
    }

    /// Appends an event at the tail. Never rejects.
    pub async fn enqueue(&self, event: FilesystemEvent) {
        trace!(kind = event.kind(), path = %event.path().display(), "Event enqueued");
        self.pending.lock().await.push_back(Entry::Event(event));
        self.counters.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    /// Appends a marker that opens the gate once it is dequeued.
    pub async fn enqueue_activation(&self) {
        trace!("Activation marker enqueued");
        self.pending.lock().await.push_back(Entry::Activate);
    }

    /// Number of pending events, markers excluded
    pub async fn len(&self) -> usize {
        self.pending
            .lock()
            .await
            .iter()
            .filter(|entry| matches!(entry, Entry::Event(_)))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Processes at most one event from the head.
    pub async fn tick(&self) -> TickOutcome {
        let mut pending = self.pending.lock().await;

        if matches!(pending.front(), Some(Entry::Activate)) {
            pending.pop_front();
            let changed = self.gate.activate();
            if changed {
                info!("Activation marker reached, remote sync active");
            }
            return TickOutcome::Activated { changed };
        }

        let Some(Entry::Event(head)) = pending.front() else {
            return TickOutcome::Idle;
        };

        if !self.gate.is_active() {
            return self.discard(&mut pending, DiscardReason::Inactive);
        }

        let target = self.classifier.classify(head);
        let Some(operation) = RemoteOperation::plan(head, target) else {
            return self.discard(&mut pending, DiscardReason::NotApplicable);
        };

        let permit = match &self.limiter {
            Some(limiter) => match Arc::clone(limiter).try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    trace!(operation = operation.name(), "In-flight limit reached");
                    return TickOutcome::Saturated;
                }
            },
            None => None,
        };

        let Some(Entry::Event(event)) = pending.pop_front() else {
            return TickOutcome::Idle;
        };
        drop(pending);
        self.counters.dequeued.fetch_add(1, Ordering::Relaxed);
        self.counters.dispatched.fetch_add(1, Ordering::Relaxed);
        self.counters.in_flight.fetch_add(1, Ordering::Relaxed);

        debug!(
            operation = operation.name(),
            url = operation.url(),
            path = %event.path().display(),
            "Dispatching remote operation"
        );

        let client = Arc::clone(&self.client);
        let counters = Arc::clone(&self.counters);
        let task_operation = operation.clone();
        let span = info_span!("remote_call", operation = operation.name());

        let handle = tokio::spawn(
            async move {
                let _permit = permit;
                match task_operation.apply(client.as_ref()).await {
                    Ok(()) => {
                        counters.succeeded.fetch_add(1, Ordering::Relaxed);
                        debug!(url = task_operation.url(), "Remote operation completed");
                    }
                    Err(e) => {
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        warn!(
                            url = task_operation.url(),
                            status = e.status(),
                            transport = e.is_transport(),
                            error = %e,
                            "Remote operation failed, event dropped"
                        );
                    }
                }
                counters.in_flight.fetch_sub(1, Ordering::Relaxed);
            }
            .instrument(span),
        );

        TickOutcome::Dispatched { operation, handle }
    }

    fn discard(
        &self,
        pending: &mut VecDeque<Entry>,
        reason: DiscardReason,
    ) -> TickOutcome {
        let Some(Entry::Event(event)) = pending.pop_front() else {
            return TickOutcome::Idle;
        };

        self.counters.dequeued.fetch_add(1, Ordering::Relaxed);
        let counter = match reason {
            DiscardReason::Inactive => &self.counters.discarded_inactive,
            DiscardReason::NotApplicable => &self.counters.discarded_not_applicable,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        trace!(
            kind = event.kind(),
            path = %event.path().display(),
            ?reason,
            "Event discarded"
        );

        TickOutcome::Discarded { event, reason }
    }

    /// Ticks every `interval` until `shutdown` is cancelled.
    ///
    /// Spawned remote calls are detached; the worker never waits for them.
    pub async fn run(&self, interval: Duration, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_ms = interval.as_millis() as u64, "Queue worker started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    // Dropping a dispatched handle detaches the call.
                    let _ = self.tick().await;
                }
            }
        }

        let stats = self.stats().await;
        info!(
            pending = stats.pending,
            dispatched = stats.dispatched,
            failed = stats.failed,
            in_flight = stats.in_flight,
            "Queue worker stopped"
        );
    }

    pub async fn stats(&self) -> QueueStats {
        let pending = self.len().await;
        let c = &self.counters;

        QueueStats {
            pending,
            enqueued: c.enqueued.load(Ordering::Relaxed),
            dequeued: c.dequeued.load(Ordering::Relaxed),
            discarded_inactive: c.discarded_inactive.load(Ordering::Relaxed),
            discarded_not_applicable: c.discarded_not_applicable.load(Ordering::Relaxed),
            dispatched: c.dispatched.load(Ordering::Relaxed),
            succeeded: c.succeeded.load(Ordering::Relaxed),
            failed: c.failed.load(Ordering::Relaxed),
            in_flight: c.in_flight.load(Ordering::Relaxed),
        }
    }
}
