//! # Runtime configuration.
//!
//! Provides [`Config`] centralized settings for a panel session.
//!
//! Config is used in three places:
//! 1. **Bus creation**: `Bus::with_config(&config)` sizes the broadcast tap.
//! 2. **Registry creation**: `ControlRegistry::with_config(bus, &config)` picks the
//!    sub-target delimiter used by `"name|index"` descriptors.
//! 3. **Observers / replay queue**: [`EventLog`](crate::EventLog) capacity and
//!    [`Config::replay_channel`].
//!
//! ## Sentinel values
//! - `event_log_capacity = 0` → unbounded record
//! - `tap_capacity = 0` / `replay_queue_capacity = 0` → clamped to 1

use tokio::sync::mpsc;

use crate::events::Event;

/// Configuration for a panel session.
///
/// ## Field semantics
/// - `tap_capacity`: broadcast tap ring buffer size (min 1)
/// - `sub_target_delimiter`: separator between a target name and its sub-target index
/// - `event_log_capacity`: events kept by [`EventLog`](crate::EventLog) (`0` = unbounded)
/// - `replay_queue_capacity`: bounded inbound replay queue size (min 1)
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the bus broadcast tap.
    ///
    /// Async receivers that lag more than `tap_capacity` events skip the oldest ones.
    pub tap_capacity: usize,

    /// Separator for `"name|index"` target descriptors.
    pub sub_target_delimiter: char,

    /// Maximum number of events retained by the event log observer.
    pub event_log_capacity: usize,

    /// Capacity of the inbound replay queue created by [`Config::replay_channel`].
    pub replay_queue_capacity: usize,
}

impl Config {
    /// Returns a tap capacity clamped to a minimum of 1.
    #[inline]
    pub fn tap_capacity_clamped(&self) -> usize {
        self.tap_capacity.max(1)
    }

    /// Returns the event log bound as an `Option`.
    ///
    /// - `None` → unbounded
    /// - `Some(n)` → keep at most `n` most recent events
    #[inline]
    pub fn event_log_limit(&self) -> Option<usize> {
        if self.event_log_capacity == 0 {
            None
        } else {
            Some(self.event_log_capacity)
        }
    }

    /// Creates the bounded channel consumed by
    /// [`ReplayEngine::drain`](crate::ReplayEngine::drain).
    pub fn replay_channel(&self) -> (mpsc::Sender<Event>, mpsc::Receiver<Event>) {
        mpsc::channel(self.replay_queue_capacity.max(1))
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `tap_capacity = 1024`
    /// - `sub_target_delimiter = '|'`
    /// - `event_log_capacity = 0` (unbounded)
    /// - `replay_queue_capacity = 256`
    fn default() -> Self {
        Self {
            tap_capacity: 1024,
            sub_target_delimiter: '|',
            event_log_capacity: 0,
            replay_queue_capacity: 256,
        }
    }
}
