//! Activation gate shared by the queue worker and the watch supervisor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Whether dequeued events may reach the remote service.
///
/// Cloning yields another handle to the same flag. The queue worker reads it
/// when an event is dequeued; the supervisor sets it once the watcher's
/// initial scan completes.
#[derive(Debug, Clone, Default)]
pub struct ActivationGate {
    active: Arc<AtomicBool>,
}

impl ActivationGate {
    pub fn new(active: bool) -> Self {
        Self {
            active: Arc::new(AtomicBool::new(active)),
        }
    }

    /// Closed until [`activate`](Self::activate) is called
    pub fn inactive() -> Self {
        Self::new(false)
    }

    /// Already open
    pub fn active() -> Self {
        Self::new(true)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Opens the gate. Returns `true` if this call changed it.
    pub fn activate(&self) -> bool {
        !self.active.swap(true, Ordering::AcqRel)
    }
}
