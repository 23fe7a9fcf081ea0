//! # Composite keys and activation contexts.
//!
//! A [`ControlKey`] names one registration on a control:
//! ```text
//! {owner uuid}-{surface id}-{control name}-{discriminator}
//!
//! discriminator:
//!   monitor_page-N   page trigger for page number N
//!   clicked-N        keyed handler with numeric id N
//!   clicked          plain handler
//! ```
//! The string form is what travels in [`EventPayload::key`] and what the registry
//! indexes; the structured form can be rebuilt from the payload components.

use std::fmt;

use super::target::SurfaceId;
use crate::events::{Event, EventKind, EventPayload, NOT_APPLICABLE, OwnerId};

/// Disambiguates registrations that share a control name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Discriminator {
    /// Page trigger, carries the page number.
    Page(i32),
    /// Keyed handler, carries the numeric id.
    Keyed(i32),
    /// Plain handler.
    Plain,
}

impl Discriminator {
    /// Rebuilds a discriminator from payload fields (`-1` = not applicable).
    pub fn from_payload(page_number: i32, numeric_id: i32) -> Self {
        if page_number != NOT_APPLICABLE {
            Discriminator::Page(page_number)
        } else if numeric_id != NOT_APPLICABLE {
            Discriminator::Keyed(numeric_id)
        } else {
            Discriminator::Plain
        }
    }

    pub fn page_number(&self) -> i32 {
        match self {
            Discriminator::Page(n) => *n,
            _ => NOT_APPLICABLE,
        }
    }

    pub fn numeric_id(&self) -> i32 {
        match self {
            Discriminator::Keyed(n) => *n,
            _ => NOT_APPLICABLE,
        }
    }
}

impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discriminator::Page(n) => write!(f, "monitor_page-{n}"),
            Discriminator::Keyed(n) => write!(f, "clicked-{n}"),
            Discriminator::Plain => f.write_str("clicked"),
        }
    }
}

/// Structured composite key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ControlKey {
    pub owner: OwnerId,
    pub surface: SurfaceId,
    pub name: String,
    pub discriminator: Discriminator,
}

impl ControlKey {
    pub fn new(owner: OwnerId, surface: SurfaceId, name: impl Into<String>, discriminator: Discriminator) -> Self {
        Self {
            owner,
            surface,
            name: name.into(),
            discriminator,
        }
    }

    /// Rebuilds the key from an event's owner id and payload components.
    ///
    /// Ignores `payload.key`; see [`ControlKey::resolve_text`] for the authoritative form.
    pub fn from_event(ev: &Event) -> Self {
        let p = &ev.payload;
        Self {
            owner: ev.owner_id,
            surface: SurfaceId(p.control_surface_id),
            name: p.control_name.clone(),
            discriminator: Discriminator::from_payload(p.page_number, p.numeric_id),
        }
    }

    /// Key string an event addresses: `payload.key` when present, otherwise the
    /// key rebuilt from the components.
    pub fn resolve_text(ev: &Event) -> String {
        let rebuilt = Self::from_event(ev).to_string();
        if ev.payload.key.is_empty() {
            return rebuilt;
        }
        if ev.payload.key != rebuilt {
            tracing::warn!(
                target: "panelbus::replay",
                key = %ev.payload.key,
                rebuilt = %rebuilt,
                "payload components disagree with key; using key"
            );
        }
        ev.payload.key.clone()
    }

    /// Payload template carrying this key and its components.
    pub fn payload(&self) -> EventPayload {
        EventPayload::new(self.to_string(), self.surface.0, self.name.clone())
            .with_page_number(self.discriminator.page_number())
            .with_numeric_id(self.discriminator.numeric_id())
    }
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}-{}", self.owner, self.surface, self.name, self.discriminator)
    }
}

/// Emission template bound to a control at registration time.
///
/// The dispatch path reads this value to build events; nothing is captured in
/// closures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivationContext {
    key: ControlKey,
    template: EventPayload,
}

impl ActivationContext {
    pub fn new(key: ControlKey) -> Self {
        let template = key.payload();
        Self { key, template }
    }

    /// Key string (same as `payload().key`).
    pub fn key_text(&self) -> &str {
        &self.template.key
    }

    pub fn key(&self) -> &ControlKey {
        &self.key
    }

    pub fn payload(&self) -> &EventPayload {
        &self.template
    }

    /// Builds a fresh event of `kind` for this context.
    pub fn event(&self, kind: EventKind) -> Event {
        Event::new(kind, self.key.owner, self.template.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn owner() -> OwnerId {
        OwnerId(Uuid::from_u128(0x1))
    }

    #[test]
    fn test_key_strings() {
        let surface = SurfaceId(3);
        let o = "00000000-0000-0000-0000-000000000001";
        assert_eq!(
            ControlKey::new(owner(), surface, "Throttle", Discriminator::Plain).to_string(),
            format!("{o}-3-Throttle-clicked")
        );
        assert_eq!(
            ControlKey::new(owner(), surface, "Throttle", Discriminator::Keyed(4)).to_string(),
            format!("{o}-3-Throttle-clicked-4")
        );
        assert_eq!(
            ControlKey::new(owner(), surface, "Mfd", Discriminator::Page(2)).to_string(),
            format!("{o}-3-Mfd-monitor_page-2")
        );
    }

    #[test]
    fn test_unowned_key_uses_nil_uuid() {
        let key = ControlKey::new(OwnerId::NONE, SurfaceId(0), "B", Discriminator::Plain);
        assert_eq!(key.to_string(), "00000000-0000-0000-0000-000000000000-0-B-clicked");
    }

    #[test]
    fn test_event_rebuilds_same_key() {
        for disc in [Discriminator::Plain, Discriminator::Keyed(9), Discriminator::Page(1)] {
            let key = ControlKey::new(owner(), SurfaceId(5), "Gear", disc);
            let ev = ActivationContext::new(key.clone()).event(EventKind::Click);
            assert_eq!(ControlKey::from_event(&ev), key);
            assert_eq!(ControlKey::resolve_text(&ev), key.to_string());
        }
    }

    #[test]
    fn test_empty_payload_key_is_rebuilt() {
        let key = ControlKey::new(owner(), SurfaceId(5), "Gear", Discriminator::Keyed(2));
        let mut ev = ActivationContext::new(key.clone()).event(EventKind::Release);
        ev.payload.key.clear();
        assert_eq!(ControlKey::resolve_text(&ev), key.to_string());
    }

    #[test]
    fn test_payload_key_is_authoritative() {
        let key = ControlKey::new(owner(), SurfaceId(5), "Gear", Discriminator::Plain);
        let mut ev = ActivationContext::new(key).event(EventKind::Click);
        ev.payload.key = "custom".into();
        assert_eq!(ControlKey::resolve_text(&ev), "custom");
    }
}
