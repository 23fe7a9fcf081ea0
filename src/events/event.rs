//! # Activation events emitted by controls and consumed by replay.
//!
//! The [`EventKind`] enum classifies events:
//! - **Click**: a control was activated (pressed)
//! - **Release**: a control was released
//! - **Other**: any other kind received from the wire; kept verbatim so replay can
//!   report it instead of failing to decode
//!
//! The [`Event`] struct carries a 128-bit id, the owning-container id and an
//! [`EventPayload`] holding the composite key and its components.
//!
//! ## Wire format
//! Events serialize to flat camelCase JSON:
//! ```text
//! { "id": uuid, "kind": "click"|"release", "ownerId": uuid,
//!   "key": string, "controlSurfaceId": int, "controlName": string,
//!   "pageNumber": int, "numericId": int }
//! ```
//! - A missing `id` is replaced by a fresh v4 UUID.
//! - An unowned control serializes `ownerId` as the nil UUID, never `null`.
//! - `pageNumber` / `numericId` use `-1` when they do not apply.
//!
//! ## Example
//! ```rust
//! use panelbus::{Event, EventKind, EventPayload, OwnerId};
//!
//! let ev = Event::new(
//!     EventKind::Click,
//!     OwnerId::NONE,
//!     EventPayload::new("00000000-0000-0000-0000-000000000000-3-Throttle-clicked", 3, "Throttle"),
//! );
//!
//! let json = ev.to_json().unwrap();
//! let back = Event::from_json(&json).unwrap();
//! assert_eq!(back, ev);
//! assert!(json.contains("\"ownerId\":\"00000000-0000-0000-0000-000000000000\""));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel for payload discriminators that do not apply.
pub const NOT_APPLICABLE: i32 = -1;

fn not_applicable() -> i32 {
    NOT_APPLICABLE
}

/// Identifier of the container (vessel, panel, session) that owns a control.
///
/// "No owner" is [`OwnerId::NONE`], the nil UUID.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub Uuid);

impl OwnerId {
    /// The unowned sentinel.
    pub const NONE: OwnerId = OwnerId(Uuid::nil());

    /// Generates a random owner id.
    pub fn random() -> Self {
        OwnerId(Uuid::new_v4())
    }

    /// Maps an optional container id to an owner id (`None` → [`OwnerId::NONE`]).
    pub fn from_optional(id: Option<Uuid>) -> Self {
        id.map(OwnerId).unwrap_or(OwnerId::NONE)
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for OwnerId {
    fn from(value: Uuid) -> Self {
        OwnerId(value)
    }
}

/// Classification of activation events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    /// Control activated.
    Click,
    /// Control released.
    Release,
    /// Unrecognized kind, preserved as received.
    Other(String),
}

impl EventKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Click => "click",
            EventKind::Release => "release",
            EventKind::Other(raw) => raw,
        }
    }
}

impl From<String> for EventKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "click" => EventKind::Click,
            "release" => EventKind::Release,
            _ => EventKind::Other(value),
        }
    }
}

impl From<EventKind> for String {
    fn from(value: EventKind) -> Self {
        match value {
            EventKind::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite key plus the components it was built from.
///
/// `key` is authoritative for replay; the other fields are diagnostic and let a
/// receiver rebuild the key when `key` is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[serde(default)]
    pub key: String,
    pub control_surface_id: i32,
    pub control_name: String,
    /// Page number for page-trigger controls, `-1` otherwise.
    #[serde(default = "not_applicable")]
    pub page_number: i32,
    /// Numeric id for keyed controls, `-1` otherwise.
    #[serde(default = "not_applicable")]
    pub numeric_id: i32,
}

impl EventPayload {
    /// Creates a payload with both discriminators set to `-1`.
    pub fn new(key: impl Into<String>, control_surface_id: i32, control_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            control_surface_id,
            control_name: control_name.into(),
            page_number: NOT_APPLICABLE,
            numeric_id: NOT_APPLICABLE,
        }
    }

    #[inline]
    pub fn with_page_number(mut self, page_number: i32) -> Self {
        self.page_number = page_number;
        self
    }

    #[inline]
    pub fn with_numeric_id(mut self, numeric_id: i32) -> Self {
        self.numeric_id = numeric_id;
        self
    }
}

/// A single control activation or release.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique event id.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Event classification.
    pub kind: EventKind,
    /// Owning container, nil when unowned.
    #[serde(default)]
    pub owner_id: OwnerId,
    /// Composite key and its components.
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl Event {
    /// Creates a new event with a freshly generated id.
    pub fn new(kind: EventKind, owner_id: OwnerId, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            owner_id,
            payload,
        }
    }

    /// Replaces the generated id.
    #[inline]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Composite key carried by the payload.
    #[inline]
    pub fn key(&self) -> &str {
        &self.payload.key
    }

    #[inline]
    pub fn is_click(&self) -> bool {
        matches!(self.kind, EventKind::Click)
    }

    #[inline]
    pub fn is_release(&self) -> bool {
        matches!(self.kind, EventKind::Release)
    }

    /// Encodes the event in its JSON wire format.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes an event from its JSON wire format.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let ev = Event::new(
            EventKind::Release,
            OwnerId::NONE,
            EventPayload::new("k", 4, "Gear").with_numeric_id(7),
        )
        .with_id(Uuid::from_u128(1));
        let value: serde_json::Value = serde_json::from_str(&ev.to_json().unwrap()).unwrap();

        assert_eq!(value["id"], "00000000-0000-0000-0000-000000000001");
        assert_eq!(value["kind"], "release");
        assert_eq!(value["ownerId"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(value["key"], "k");
        assert_eq!(value["controlSurfaceId"], 4);
        assert_eq!(value["controlName"], "Gear");
        assert_eq!(value["pageNumber"], -1);
        assert_eq!(value["numericId"], 7);
    }

    #[test]
    fn test_missing_optional_fields_get_defaults() {
        let raw = r#"{"kind":"click","controlSurfaceId":2,"controlName":"Stage"}"#;
        let ev = Event::from_json(raw).unwrap();

        assert!(!ev.id.is_nil());
        assert!(ev.owner_id.is_none());
        assert_eq!(ev.key(), "");
        assert_eq!(ev.payload.page_number, NOT_APPLICABLE);
        assert_eq!(ev.payload.numeric_id, NOT_APPLICABLE);
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let raw = r#"{"kind":"hover","controlSurfaceId":0,"controlName":"x"}"#;
        let ev = Event::from_json(raw).unwrap();
        assert_eq!(ev.kind, EventKind::Other("hover".into()));
        assert!(ev.to_json().unwrap().contains("\"kind\":\"hover\""));
    }

    #[test]
    fn test_owner_from_optional() {
        assert_eq!(OwnerId::from_optional(None), OwnerId::NONE);
        let id = Uuid::new_v4();
        assert_eq!(OwnerId::from_optional(Some(id)), OwnerId(id));
    }
}
