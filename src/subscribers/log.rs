//! # EventLog - event recorder and printer
//!
//! A passive subscriber that records incoming [`Event`]s in memory and writes one
//! human-readable `tracing` line per event. Use it for diagnostics, audits and
//! for capturing events that are replayed later.
//!
//! ## Example output
//! ```text
//! [click] key="…-3-Throttle-clicked" owner=… surface=3 control="Throttle" page=-1 numeric=-1
//! [release] key="…-3-Throttle-clicked" owner=… surface=3 control="Throttle" page=-1 numeric=-1
//! [unknown:hover] key="…" owner=…
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::Config;
use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event recorder subscriber.
#[derive(Debug, Default)]
pub struct EventLog {
    records: Mutex<VecDeque<Event>>,
    limit: Option<usize>,
}

impl EventLog {
    /// Construct an unbounded [`EventLog`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an [`EventLog`] that keeps only the most recent `limit` events.
    #[must_use]
    pub fn bounded(limit: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(limit)),
            limit: Some(limit.max(1)),
        }
    }

    /// Construct an [`EventLog`] bounded by [`Config::event_log_capacity`].
    #[must_use]
    pub fn with_config(cfg: &Config) -> Self {
        match cfg.event_log_limit() {
            Some(limit) => Self::bounded(limit),
            None => Self::new(),
        }
    }

    /// Copies the recorded events, oldest first.
    pub fn records(&self) -> Vec<Event> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops every recorded event.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Encodes the record as JSON lines (one wire-format event per line).
    pub fn to_json_lines(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for ev in self.lock().iter() {
            out.push_str(&ev.to_json()?);
            out.push('\n');
        }
        Ok(out)
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Event>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Subscribe for EventLog {
    fn on_event(&self, e: &Event) {
        let p = &e.payload;
        match &e.kind {
            EventKind::Click | EventKind::Release => {
                tracing::info!(
                    target: "panelbus::events",
                    "[{}] key={:?} owner={} surface={} control={:?} page={} numeric={} id={}",
                    e.kind,
                    p.key,
                    e.owner_id,
                    p.control_surface_id,
                    p.control_name,
                    p.page_number,
                    p.numeric_id,
                    e.id
                );
            }
            EventKind::Other(raw) => {
                tracing::info!(
                    target: "panelbus::events",
                    "[unknown:{raw}] key={:?} owner={} id={}",
                    p.key,
                    e.owner_id,
                    e.id
                );
            }
        }

        let mut records = self.lock();
        if let Some(limit) = self.limit {
            while records.len() >= limit {
                records.pop_front();
            }
        }
        records.push_back(e.clone());
    }

    fn name(&self) -> &'static str {
        "event-log"
    }
}
