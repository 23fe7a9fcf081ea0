//! # Inbound replay queue.
//!
//! A transport (or a persisted log being played back) pushes events into a
//! bounded [`mpsc`] channel; [`ReplayEngine::drain`] replays them one by one on
//! the task that owns the registry.
//!
//! ```text
//! transport ── tx.send(Event) ──► [mpsc queue] ──► drain() ──► ReplayEngine::replay
//!                                                   │
//!                                  exits when: channel closed | token cancelled
//! ```
//!
//! A failed replay is counted and the queue keeps going.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::engine::{ReplayEngine, ReplayStats};
use crate::controls::ControlRegistry;
use crate::events::Event;

impl ReplayEngine {
    /// Replays queued events until `rx` closes or `token` is cancelled.
    ///
    /// Cancellation is checked before each event; events still queued at that
    /// point stay in the channel.
    pub async fn drain(
        &self,
        registry: &mut ControlRegistry,
        mut rx: mpsc::Receiver<Event>,
        token: CancellationToken,
    ) -> ReplayStats {
        let mut stats = ReplayStats::default();

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                msg = rx.recv() => match msg {
                    Some(ev) => stats.record(&self.replay(registry, &ev)),
                    None => break,
                }
            }
        }

        tracing::debug!(
            target: "panelbus::replay",
            replayed = stats.replayed,
            failed = stats.failed,
            "replay queue drained"
        );
        stats
    }
}
