//! Replay: reproducing activations from their events.
//!
//! - [`ReplayEngine::replay`] single event, synchronous
//! - [`ReplayEngine::replay_all`] ordered batch (e.g. a captured [`EventLog`](crate::EventLog))
//! - [`ReplayEngine::drain`] async inbound queue with cancellation

mod engine;
mod queue;

pub use engine::{ReplayEngine, ReplayStats};
