//! # panelbus
//!
//! **panelbus** binds control surfaces (buttons on an instrument panel) to
//! behaviour handlers at runtime, captures every activation as a uniquely keyed
//! [`Event`], and replays those events later to reproduce the same activation
//! without the caller, geometry or UI framework that produced it.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   host code / scene graph
//!        │ resolve(resolver, origin, "name|index")
//!        │ register(id, Registration::{PageTrigger, Keyed, Plain})
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  ControlRegistry (one per session)                                │
//! │  - (owner, node) → Control        one control per target          │
//! │  - key → Control                  one control per composite key   │
//! │  - Control: PageCycleGroups, keyed handlers, plain handlers,      │
//! │             ActivationContexts (emission templates)               │
//! └──────┬───────────────────────────────────────────▲────────────────┘
//!        │ activate / release                        │ lookup_by_key
//!        │ 1. page groups  2. keyed  3. plain        │
//!        │ 4. emit(Event)                            │
//!        ▼                                           │
//! ┌──────────────────────────────┐          ┌────────┴─────────┐
//! │  Bus (synchronous fan-out)   │          │   ReplayEngine   │
//! │  + broadcast tap             │          │ steps 1-3 only,  │
//! └──────┬───────────────┬───────┘          │ never emits      │
//!        ▼               ▼                  └────────▲─────────┘
//!    EventLog       tap receivers ── transport ──────┘ (mpsc queue → drain)
//! ```
//!
//! ### Composite keys
//! ```text
//! {owner uuid}-{surface id}-{control name}-monitor_page-{N}   page trigger
//! {owner uuid}-{surface id}-{control name}-clicked-{N}        keyed handler
//! {owner uuid}-{surface id}-{control name}-clicked            plain handler
//! ```
//!
//! ## Features
//! | Area              | Description                                                      | Key types / traits                          |
//! |-------------------|------------------------------------------------------------------|---------------------------------------------|
//! | **Registry**      | Resolve targets, attach handlers, activate and release controls. | [`ControlRegistry`], [`Registration`]       |
//! | **Page cycling**  | Activity-gated cycling through pages per selector.               | [`PageCycleGroup`], [`Page`], [`Selector`]  |
//! | **Events**        | Keyed activation events and their JSON wire format.              | [`Event`], [`EventKind`], [`EventPayload`]  |
//! | **Bus**           | Synchronous publish/subscribe with a broadcast tap.              | [`Bus`], [`Subscribe`]                      |
//! | **Replay**        | Reproduce activations from events, singly or from a queue.       | [`ReplayEngine`]                            |
//! | **Diagnostics**   | Record and log events.                                           | [`EventLog`]                                |
//! | **Errors**        | Typed, non-fatal errors.                                         | [`ResolveError`], [`RegistryError`], [`ReplayError`] |
//! | **Configuration** | Centralized session settings.                                    | [`Config`]                                  |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use panelbus::{
//!     Bus, ControlRegistry, EventLog, NodeHandle, Origin, OwnerId, Registration, ReplayEngine,
//!     Scope, TargetResolver,
//! };
//!
//! struct Panel;
//! impl TargetResolver for Panel {
//!     fn sub_target_count(&self) -> usize { 1 }
//!     fn find_target(&self, _scope: Scope, name: &str) -> Option<NodeHandle> {
//!         (name == "Throttle").then_some(NodeHandle(1))
//!     }
//! }
//!
//! let bus = Bus::default();
//! let log = Arc::new(EventLog::new());
//! bus.subscribe(log.clone());
//! let mut registry = ControlRegistry::new(bus);
//!
//! let origin = Origin::new(OwnerId::NONE, 3);
//! let key = registry
//!     .bind(&Panel, origin, "Throttle", Registration::plain(|| println!("throttle!")))
//!     .unwrap();
//!
//! let id = registry.lookup_by_key(&key.to_string()).unwrap();
//! registry.activate(id).unwrap();
//!
//! // Replay the captured event; nothing new is published.
//! let captured = log.records();
//! ReplayEngine::new().replay(&mut registry, &captured[0]).unwrap();
//! assert_eq!(log.len(), 1);
//! ```
mod config;
mod controls;
mod error;
mod events;
mod replay;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use controls::{
    ActivationContext, Control, ControlId, ControlKey, ControlRegistry, Discriminator, Handler,
    HandlerKind, KeyedFn, NodeHandle, Origin, Page, PageCycleGroup, PageRef, PlainFn,
    Registration, ResolvedTarget, Scope, Selector, SurfaceId, TargetDescriptor, TargetResolver,
};
pub use error::{RegistryError, ReplayError, ResolveError};
pub use events::{Bus, Event, EventKind, EventPayload, NOT_APPLICABLE, OwnerId, SubscriptionId};
pub use replay::{ReplayEngine, ReplayStats};
pub use subscribers::{EventLog, Subscribe};
