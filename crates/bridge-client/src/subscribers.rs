//! Event fan-out to dashboard subscribers.
//!
//! One socket, many independent interested parties. Subscribers are
//! UI-lifetime scoped: the registry survives reconnects, and entries are
//! removed only through [`Subscription::unsubscribe`]. Dispatch iterates
//! over a snapshot, so a subscriber may add or remove registrations (itself
//! included) while being invoked.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::warn;

use bridge_protocol::InboundEvent;

/// Callback invoked with every inbound event.
pub type EventCallback = Arc<dyn Fn(&InboundEvent) + Send + Sync>;

/// Registry of event subscribers.
#[derive(Default)]
pub struct SubscriberRegistry {
    subscribers: Mutex<HashMap<u64, EventCallback>>,
    next_id: AtomicU64,
}

impl SubscriberRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for every inbound event.
    ///
    /// The returned handle removes exactly this callback; dropping the
    /// handle without calling [`Subscription::unsubscribe`] leaves the
    /// registration in place.
    pub fn subscribe<F>(self: &Arc<Self>, callback: F) -> Subscription
    where
        F: Fn(&InboundEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let _ = self.subscribers.lock().insert(id, Arc::new(callback));
        Subscription {
            registry: Arc::clone(self),
            id,
        }
    }

    /// Register a callback for events with a specific `type` discriminator.
    pub fn subscribe_filtered<F>(
        self: &Arc<Self>,
        event_type: impl Into<String>,
        callback: F,
    ) -> Subscription
    where
        F: Fn(&InboundEvent) + Send + Sync + 'static,
    {
        let event_type = event_type.into();
        self.subscribe(move |event| {
            if event.event_type() == event_type {
                callback(event);
            }
        })
    }

    /// Dispatch an event to every currently-registered callback.
    ///
    /// Each live callback is invoked exactly once. A panicking callback is
    /// caught and logged; the remaining callbacks still run.
    pub fn broadcast(&self, event: &InboundEvent) {
        let callbacks: Vec<EventCallback> = self.subscribers.lock().values().cloned().collect();
        for callback in callbacks {
            if catch_unwind(AssertUnwindSafe(|| callback(event))).is_err() {
                warn!(
                    event_type = event.event_type(),
                    "subscriber panicked during dispatch"
                );
            }
        }
    }

    /// Number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Whether the registry has no registrations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, id: u64) {
        let _ = self.subscribers.lock().remove(&id);
    }
}

/// Handle to one registration in a [`SubscriberRegistry`].
pub struct Subscription {
    registry: Arc<SubscriberRegistry>,
    id: u64,
}

impl Subscription {
    /// Remove this registration. Calling more than once is a no-op.
    pub fn unsubscribe(&self) {
        self.registry.remove(self.id);
    }
}
