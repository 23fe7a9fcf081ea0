//! # Event bus for control activations.
//!
//! [`Bus`] fans every [`Event`] out to the registered [`Subscribe`] observers
//! **synchronously**, in the emitter's call stack, and then forwards it to an
//! optional broadcast tap for async consumers (transport, persistence).
//!
//! ## Architecture
//! ```text
//! Publishers:                         Synchronous subscribers:
//!   ControlRegistry::activate ──┐       ┌──► EventLog::on_event()
//!   ControlRegistry::release  ──┼─► Bus ┼──► Custom::on_event()
//!   host code (manual emit)   ──┘       │
//!                                       └──► tap (tokio broadcast) ──► async receivers
//! ```
//!
//! ## Rules
//! - **Synchronous fan-out**: `emit()` returns after every subscriber ran.
//! - **Subscription order**: subscribers run in the order they subscribed. The
//!   list is a hash map (O(1) subscribe/unsubscribe); ids are monotonic, so each
//!   emission sorts its snapshot by id.
//! - **No buffering**: a subscriber only sees events emitted after it subscribed.
//! - **No re-entrancy guard**: a subscriber that emits from `on_event` recurses.
//! - **Panics propagate** to the emitter; the subscriber list is never locked while
//!   a subscriber runs, so it stays consistent.
//! - **Unsubscribe during emit** takes effect from the next emission.
//!
//! ## Tap capacity
//! The tap is a [`tokio::sync::broadcast`] ring buffer. Receivers that fall
//! behind observe `RecvError::Lagged(n)` and skip the `n` oldest events. Events are
//! dropped silently when no tap receiver exists.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;

use super::event::Event;
use crate::config::Config;
use crate::subscribers::Subscribe;

/// Handle returned by [`Bus::subscribe`], used to detach the subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Shared {
    subscribers: Mutex<HashMap<SubscriptionId, Arc<dyn Subscribe>>>,
    next_id: AtomicU64,
    tap: broadcast::Sender<Event>,
}

/// Publish/subscribe channel for [`Event`]s.
///
/// ### Properties
/// - **Cloneable**: clones share the same subscriber list and tap.
/// - **Owned**: one bus per session, injected into the registry; there is no global.
#[derive(Clone)]
pub struct Bus {
    shared: Arc<Shared>,
}

impl Bus {
    /// Creates a bus whose tap holds up to `tap_capacity` events (min 1).
    pub fn new(tap_capacity: usize) -> Self {
        let (tap, _rx) = broadcast::channel::<Event>(tap_capacity.max(1));
        Self {
            shared: Arc::new(Shared {
                subscribers: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
                tap,
            }),
        }
    }

    /// Creates a bus sized from [`Config::tap_capacity`].
    pub fn with_config(cfg: &Config) -> Self {
        Self::new(cfg.tap_capacity_clamped())
    }

    /// Attaches a subscriber; it observes every event emitted from now on.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscribe>) -> SubscriptionId {
        let id = SubscriptionId(self.shared.next_id.fetch_add(1, AtomicOrdering::Relaxed));
        tracing::debug!(subscriber = subscriber.name(), ?id, "subscriber attached");
        self.lock().insert(id, subscriber);
        id
    }

    /// Detaches a subscriber. Returns `false` if the id was not attached.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock().remove(&id).is_some()
    }

    /// Delivers `ev` to every current subscriber, then to the tap.
    pub fn emit(&self, ev: Event) {
        let mut snapshot: Vec<(SubscriptionId, Arc<dyn Subscribe>)> =
            self.lock().iter().map(|(id, sub)| (*id, sub.clone())).collect();
        snapshot.sort_unstable_by_key(|(id, _)| *id);

        tracing::debug!(
            target: "panelbus::events",
            kind = %ev.kind,
            key = %ev.payload.key,
            subscribers = snapshot.len(),
            "emit"
        );

        for (_, sub) in &snapshot {
            sub.on_event(&ev);
        }
        let _ = self.shared.tap.send(ev);
    }

    /// Creates an async receiver for events emitted after this call.
    ///
    /// Each call creates an **independent** receiver.
    pub fn tap(&self) -> broadcast::Receiver<Event> {
        self.shared.tap.subscribe()
    }

    /// Number of attached synchronous subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SubscriptionId, Arc<dyn Subscribe>>> {
        self.shared
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::with_config(&Config::default())
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("subscribers", &self.subscriber_count())
            .field("tap_receivers", &self.shared.tap.receiver_count())
            .finish()
    }
}
