//! # Replay engine.
//!
//! Turns an [`Event`] back into the activation it describes:
//!
//! ```text
//! Event ─► ControlKey::resolve_text ─► registry.lookup_by_key
//!            │                              ├─ None ─► error!, ReplayError::UnknownKey
//!            │                              └─ Some(id)
//!            └─ kind: click   ─► Control::run_activation   (page groups, keyed, plain)
//!                     release ─► Control::run_release      (keyed, plain)
//!                     other   ─► error!, ReplayError::UnknownKind
//! ```
//!
//! Replay calls the underlying handler paths directly and never touches the bus,
//! so replayed activations do not publish new events.

use crate::controls::{ControlId, ControlKey, ControlRegistry};
use crate::error::ReplayError;
use crate::events::{Event, EventKind};

/// Counters returned by batch replays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Events dispatched to a control.
    pub replayed: u64,
    /// Events rejected (unknown key or kind).
    pub failed: u64,
}

impl ReplayStats {
    pub(crate) fn record(&mut self, outcome: &Result<ControlId, ReplayError>) {
        match outcome {
            Ok(_) => self.replayed += 1,
            Err(_) => self.failed += 1,
        }
    }
}

/// Replays events against a [`ControlRegistry`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ReplayEngine;

impl ReplayEngine {
    pub fn new() -> Self {
        Self
    }

    /// Replays one event. Errors are logged and returned; they never panic.
    pub fn replay(&self, registry: &mut ControlRegistry, event: &Event) -> Result<ControlId, ReplayError> {
        let key = ControlKey::resolve_text(event);

        let Some(id) = registry.lookup_by_key(&key) else {
            let err = ReplayError::UnknownKey { key };
            tracing::error!(target: "panelbus::replay", error = %err, label = err.as_label(), event_id = %event.id, "replay skipped");
            return Err(err);
        };
        let Some(control) = registry.control_mut(id) else {
            return Err(ReplayError::UnknownKey { key });
        };

        match &event.kind {
            EventKind::Click => control.run_activation(),
            EventKind::Release => control.run_release(),
            EventKind::Other(kind) => {
                let err = ReplayError::UnknownKind { kind: kind.clone() };
                tracing::error!(target: "panelbus::replay", error = %err, label = err.as_label(), event_id = %event.id, "replay skipped");
                return Err(err);
            }
        }

        tracing::debug!(target: "panelbus::replay", key = %key, kind = %event.kind, event_id = %event.id, "replayed");
        Ok(id)
    }

    /// Replays events in order; a failure only affects its own event.
    pub fn replay_all<'a, I>(&self, registry: &mut ControlRegistry, events: I) -> ReplayStats
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut stats = ReplayStats::default();
        for ev in events {
            stats.record(&self.replay(registry, ev));
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::page_fixtures::{TestPage, recording_selector};
    use crate::controls::registry_fixtures::Panel;
    use crate::controls::{Origin, Registration, Selector};
    use crate::events::{Bus, EventPayload, OwnerId};
    use crate::subscribers::EventLog;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    type Calls = Arc<Mutex<Vec<String>>>;

    fn session() -> (ControlRegistry, Arc<EventLog>) {
        let bus = Bus::default();
        let log = Arc::new(EventLog::new());
        bus.subscribe(log.clone());
        (ControlRegistry::new(bus), log)
    }

    /// Registers the same set of handlers on any registry.
    fn populate(reg: &mut ControlRegistry, owner: OwnerId, calls: &Calls, selector: &Selector) {
        let origin = Origin::new(owner, 1);

        let c = calls.clone();
        let r = calls.clone();
        reg.bind(
            &Panel,
            origin,
            "Throttle",
            Registration::plain_with_release(
                move || c.lock().unwrap().push("throttle:down".into()),
                move || r.lock().unwrap().push("throttle:up".into()),
            ),
        )
        .unwrap();

        let c = calls.clone();
        let r = calls.clone();
        reg.bind(
            &Panel,
            origin,
            "Gear",
            Registration::keyed(
                4,
                move |id| c.lock().unwrap().push(format!("gear:down:{id}")),
                move |id| r.lock().unwrap().push(format!("gear:up:{id}")),
            ),
        )
        .unwrap();

        for n in 0..2 {
            reg.bind(&Panel, origin, "Mfd", Registration::page_trigger(selector, TestPage::new(n, true)))
                .unwrap();
        }
    }

    fn recording_into(calls: &Calls) -> Selector {
        let c = calls.clone();
        Selector::new(move |page| c.lock().unwrap().push(format!("page:{}", page.page_number())))
    }

    #[test]
    fn test_replay_fidelity_on_fresh_registry() {
        let owner = OwnerId(Uuid::from_u128(7));
        let recorded_calls = Calls::default();
        let (mut recorded, log) = session();
        populate(&mut recorded, owner, &recorded_calls, &recording_into(&recorded_calls));

        for key in ["Throttle-clicked", "Gear-clicked-4", "Mfd-monitor_page-0"] {
            let id = recorded.lookup_by_key(&format!("{owner}-1-{key}")).unwrap();
            recorded.activate(id).unwrap();
            recorded.release(id).unwrap();
        }
        let captured = log.records();
        assert_eq!(captured.len(), 6);

        let replay_calls = Calls::default();
        let (mut fresh, fresh_log) = session();
        populate(&mut fresh, owner, &replay_calls, &recording_into(&replay_calls));

        let stats = ReplayEngine::new().replay_all(&mut fresh, &captured);

        assert_eq!(stats, ReplayStats { replayed: 6, failed: 0 });
        assert_eq!(*replay_calls.lock().unwrap(), *recorded_calls.lock().unwrap());
        assert!(fresh_log.is_empty());
    }

    #[test]
    fn test_replay_does_not_emit() {
        let (mut reg, log) = session();
        let (selector, _) = recording_selector();
        let calls = Calls::default();
        populate(&mut reg, OwnerId::NONE, &calls, &selector);
        let mut tap = reg.bus().tap();

        let key = format!("{}-1-Throttle-clicked", OwnerId::NONE);
        let ev = Event::new(EventKind::Click, OwnerId::NONE, EventPayload::new(key, 1, "Throttle"));
        ReplayEngine::new().replay(&mut reg, &ev).unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["throttle:down".to_string()]);
        assert!(log.is_empty());
        assert!(tap.try_recv().is_err());
    }

    #[test]
    fn test_unknown_key_invokes_nothing() {
        let (mut reg, _) = session();
        let (selector, _) = recording_selector();
        let calls = Calls::default();
        populate(&mut reg, OwnerId::NONE, &calls, &selector);

        let ev = Event::new(EventKind::Click, OwnerId::NONE, EventPayload::new("stale-key", 1, "Throttle"));
        let err = ReplayEngine::new().replay(&mut reg, &ev).unwrap_err();

        assert_eq!(err, ReplayError::UnknownKey { key: "stale-key".into() });
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_kind_invokes_nothing() {
        let (mut reg, _) = session();
        let (selector, _) = recording_selector();
        let calls = Calls::default();
        populate(&mut reg, OwnerId::NONE, &calls, &selector);

        let key = format!("{}-1-Gear-clicked-4", OwnerId::NONE);
        let ev = Event::new(
            EventKind::Other("hover".into()),
            OwnerId::NONE,
            EventPayload::new(key, 1, "Gear").with_numeric_id(4),
        );
        let err = ReplayEngine::new().replay(&mut reg, &ev).unwrap_err();

        assert_eq!(err.as_label(), "replay_unknown_kind");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_release_replay_does_not_advance_pages() {
        let (mut reg, _) = session();
        let (selector, pages) = recording_selector();
        let calls = Calls::default();
        populate(&mut reg, OwnerId::NONE, &calls, &selector);

        let key = format!("{}-1-Mfd-monitor_page-0", OwnerId::NONE);
        let payload = EventPayload::new(key, 1, "Mfd").with_page_number(0);
        let engine = ReplayEngine::new();
        engine
            .replay(&mut reg, &Event::new(EventKind::Release, OwnerId::NONE, payload.clone()))
            .unwrap();
        assert!(pages.lock().unwrap().is_empty());

        engine
            .replay(&mut reg, &Event::new(EventKind::Click, OwnerId::NONE, payload.clone()))
            .unwrap();
        engine
            .replay(&mut reg, &Event::new(EventKind::Click, OwnerId::NONE, payload))
            .unwrap();
        assert_eq!(*pages.lock().unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_key_rebuilt_from_components() {
        let (mut reg, _) = session();
        let (selector, _) = recording_selector();
        let calls = Calls::default();
        populate(&mut reg, OwnerId::NONE, &calls, &selector);

        let ev = Event::new(
            EventKind::Click,
            OwnerId::NONE,
            EventPayload::new("", 1, "Gear").with_numeric_id(4),
        );
        ReplayEngine::new().replay(&mut reg, &ev).unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["gear:down:4".to_string()]);
    }

    #[test]
    fn test_end_to_end_throttle_replay() {
        let owner = OwnerId::random();
        let origin = Origin::new(owner, 3);
        let key = format!("{owner}-3-Throttle-clicked");

        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let (mut first, log) = session();
        first
            .bind(&Panel, origin, "Throttle", Registration::plain(move || {
                h.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        let id = first.lookup_by_key(&key).unwrap();
        first.activate(id).unwrap();
        let e1 = log.records().remove(0);
        assert_eq!(e1.key(), key);

        let replayed = Arc::new(AtomicUsize::new(0));
        let h = replayed.clone();
        let (mut second, _) = session();
        second
            .bind(&Panel, origin, "Throttle", Registration::plain(move || {
                h.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        let wire = e1.to_json().unwrap();
        ReplayEngine::new()
            .replay(&mut second, &Event::from_json(&wire).unwrap())
            .unwrap();

        assert_eq!(replayed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shared_container_replays_in_any_registration_order() {
        let owner = OwnerId(Uuid::from_u128(11));
        let bind_gear = |reg: &mut ControlRegistry, calls: &Calls, surface: i32, n: i32| {
            let c = calls.clone();
            reg.bind(
                &Panel,
                Origin::new(owner, surface),
                "Throttle|-1",
                Registration::keyed(n, move |id| c.lock().unwrap().push(format!("down:{id}")), |_| {}),
            )
            .unwrap();
        };

        let recorded_calls = Calls::default();
        let (mut recorded, log) = session();
        bind_gear(&mut recorded, &recorded_calls, 1, 4);
        bind_gear(&mut recorded, &recorded_calls, 2, 5);
        let id = recorded.lookup_by_key(&format!("{owner}-2-Throttle-clicked-5")).unwrap();
        recorded.activate(id).unwrap();
        let captured = log.records();

        let replay_calls = Calls::default();
        let (mut reversed, _) = session();
        bind_gear(&mut reversed, &replay_calls, 2, 5);
        bind_gear(&mut reversed, &replay_calls, 1, 4);

        let stats = ReplayEngine::new().replay_all(&mut reversed, &captured);

        assert_eq!(stats, ReplayStats { replayed: 1, failed: 0 });
        let mut replayed = replay_calls.lock().unwrap().clone();
        let mut expected = recorded_calls.lock().unwrap().clone();
        replayed.sort();
        expected.sort();
        assert_eq!(replayed, vec!["down:4".to_string(), "down:5".to_string()]);
        assert_eq!(replayed, expected);
    }
}
