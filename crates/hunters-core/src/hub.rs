//! Broadcast hub: fans world snapshots out to live observers.
//!
//! Each observer owns a bounded [`broadcast`] ring. Publishing never waits
//! on an observer: a full ring overwrites that observer's oldest buffered
//! snapshot, so the newest one is always kept. A disconnected observer or
//! an expired subscription is removed from the registry. None of this is
//! reported to the publisher as an error.
//!
//! Every [`Subscription`] also discards snapshots whose version is not
//! strictly greater than the last one it yielded, so a snapshot published
//! late (or twice) never reaches the observer out of order.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use hunters_types::WorldSnapshot;
use tokio::sync::{Mutex, broadcast};
use tokio::time::Instant;
use tracing::debug;

/// Why an observer was dropped from the registry. Never leaves the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
enum DeliveryError {
    /// The observer dropped its receiver.
    #[error("observer disconnected")]
    Closed,
    /// The subscription outlived its maximum lifetime.
    #[error("subscription expired")]
    Expired,
}

/// How a delivered snapshot landed in the observer's ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    /// There was room.
    Queued,
    /// The ring was full; the oldest unread snapshot was overwritten.
    Overwrote,
}

/// Outcome of one [`BroadcastHub::publish`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Observers that received the snapshot.
    pub delivered: usize,
    /// Of those, observers whose oldest unread snapshot was overwritten.
    pub lagged: usize,
    /// Observers removed from the registry.
    pub evicted: usize,
}

struct Observer {
    tx: broadcast::Sender<Arc<WorldSnapshot>>,
    capacity: usize,
    expires_at: Option<Instant>,
}

impl Observer {
    fn deliver(&self, snapshot: &Arc<WorldSnapshot>, now: Instant) -> Result<Delivery, DeliveryError> {
        if self.expires_at.is_some_and(|deadline| now >= deadline) {
            return Err(DeliveryError::Expired);
        }
        let delivery = if self.tx.len() >= self.capacity {
            Delivery::Overwrote
        } else {
            Delivery::Queued
        };
        self.tx
            .send(Arc::clone(snapshot))
            .map(|_| delivery)
            .map_err(|_| DeliveryError::Closed)
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    observers: BTreeMap<u64, Observer>,
}

/// Registry of live observers.
pub struct BroadcastHub {
    buffer: usize,
    max_lifetime: Duration,
    registry: Mutex<Registry>,
}

impl BroadcastHub {
    /// Create a hub whose observers buffer `buffer` snapshots and are
    /// force-closed after `max_lifetime`.
    ///
    /// `buffer` is rounded up to a power of two, as [`broadcast`] requires.
    pub fn new(buffer: usize, max_lifetime: Duration) -> Self {
        let buffer = buffer.max(1);
        Self {
            buffer: buffer.checked_next_power_of_two().unwrap_or(buffer),
            max_lifetime,
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Register an observer and queue `initial` as its first snapshot.
    pub async fn subscribe(&self, initial: Arc<WorldSnapshot>) -> Subscription {
        let (tx, rx) = broadcast::channel(self.buffer);
        let expires_at = Instant::now().checked_add(self.max_lifetime);

        // `rx` is alive, so this cannot fail.
        let _ = tx.send(initial);

        let mut registry = self.registry.lock().await;
        let id = registry.next_id;
        registry.next_id = registry.next_id.saturating_add(1);
        registry.observers.insert(
            id,
            Observer {
                tx,
                capacity: self.buffer,
                expires_at,
            },
        );
        debug!(subscriber = id, total = registry.observers.len(), "Observer subscribed");

        Subscription {
            id,
            rx,
            expires_at,
            last_version: None,
        }
    }

    /// Deliver `snapshot` to every current observer.
    pub async fn publish(&self, snapshot: &Arc<WorldSnapshot>) -> PublishReport {
        let now = Instant::now();
        let mut report = PublishReport::default();
        let mut registry = self.registry.lock().await;

        registry.observers.retain(|id, observer| match observer.deliver(snapshot, now) {
            Ok(delivery) => {
                report.delivered = report.delivered.saturating_add(1);
                if delivery == Delivery::Overwrote {
                    debug!(subscriber = id, version = snapshot.version(), "Observer lagging, oldest snapshot overwritten");
                    report.lagged = report.lagged.saturating_add(1);
                }
                true
            }
            Err(reason) => {
                debug!(subscriber = id, %reason, "Observer evicted");
                report.evicted = report.evicted.saturating_add(1);
                false
            }
        });
        report
    }

    /// Number of registered observers (including ones not yet found dead).
    #[cfg(test)]
    pub(crate) async fn subscriber_count(&self) -> usize {
        self.registry.lock().await.observers.len()
    }
}

/// One observer's end of the hub.
///
/// Dropping it disconnects the observer; the hub notices on the next
/// publish.
pub struct Subscription {
    id: u64,
    rx: broadcast::Receiver<Arc<WorldSnapshot>>,
    expires_at: Option<Instant>,
    last_version: Option<u64>,
}

impl Subscription {
    /// Registry id, for logging.
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the next snapshot newer than the last one returned.
    ///
    /// An observer that fell behind skips straight to the oldest snapshot
    /// still buffered. Returns `None` once the subscription has expired or
    /// the hub is gone.
    pub async fn next(&mut self) -> Option<Arc<WorldSnapshot>> {
        loop {
            let received = match self.expires_at {
                Some(deadline) => tokio::time::timeout_at(deadline, self.rx.recv())
                    .await
                    .ok()?,
                None => self.rx.recv().await,
            };
            let snapshot = match received {
                Ok(snapshot) => snapshot,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(subscriber = self.id, skipped, "Observer skipped overwritten snapshots");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            };
            let version = snapshot.version();
            if self.last_version.is_some_and(|last| version <= last) {
                debug!(subscriber = self.id, version, "Dropping stale snapshot");
                continue;
            }
            self.last_version = Some(version);
            return Some(snapshot);
        }
    }
}
