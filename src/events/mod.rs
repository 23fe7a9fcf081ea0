//! Activation events: types and bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to activations emitted by the control registry.
//!
//! ## Contents
//! - [`EventKind`], [`Event`], [`EventPayload`], [`OwnerId`] event data and wire format
//! - [`Bus`] synchronous fan-out plus a `tokio::sync::broadcast` tap
//!
//! ## Quick reference
//! - **Publishers**: `ControlRegistry::activate` / `ControlRegistry::release`.
//! - **Consumers**: [`Subscribe`](crate::Subscribe) implementations such as
//!   [`EventLog`](crate::EventLog), and async tap receivers.
//! - **Never a publisher**: `ReplayEngine`.

mod bus;
mod event;

pub use bus::{Bus, SubscriptionId};
pub use event::{Event, EventKind, EventPayload, NOT_APPLICABLE, OwnerId};
