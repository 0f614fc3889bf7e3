//! Listener registry for download change notifications.
//!
//! A [`Subscription`] unregisters itself when dropped, so a listener is
//! released exactly once whatever way the consumer finishes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

use super::DownloadDelta;

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    listeners: RwLock<HashMap<u64, mpsc::UnboundedSender<DownloadDelta>>>,
}

/// Shared fan-out of download notifications. Cheap to clone.
#[derive(Clone, Default)]
pub struct DownloadEvents {
    registry: Arc<Registry>,
}

impl DownloadEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.registry.listeners.write().unwrap().insert(id, tx);
        tracing::trace!(listener = id, "download listener added");
        Subscription {
            id,
            events: self.clone(),
            rx,
        }
    }

    /// Delivers `delta` to every current listener.
    pub fn publish(&self, delta: DownloadDelta) {
        for tx in self.registry.listeners.read().unwrap().values() {
            let _ = tx.send(delta.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.listeners.read().unwrap().len()
    }

    fn unregister(&self, id: u64) {
        if self.registry.listeners.write().unwrap().remove(&id).is_some() {
            tracing::trace!(listener = id, "download listener removed");
        }
    }
}

/// A registered listener. Dropping it removes the listener.
pub struct Subscription {
    id: u64,
    events: DownloadEvents,
    rx: mpsc::UnboundedReceiver<DownloadDelta>,
}

impl Subscription {
    /// Next notification; `None` only if the listener was removed.
    pub async fn recv(&mut self) -> Option<DownloadDelta> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.events.unregister(self.id);
    }
}
