//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the built-in [`EventLog`]
//! observer for events fanned out by the [`Bus`](crate::Bus).
//!
//! ## Architecture
//! ```text
//! ControlRegistry ── emit(Event) ──► Bus ──► Subscribe::on_event(&Event)
//!                                              │
//!                                         ┌────┴─────┬─────────┐
//!                                         ▼          ▼         ▼
//!                                      EventLog    Custom     ...
//! ```
//!
//! Subscribers are **passive**: they observe and record, never dispatch.

mod log;
mod subscriber;

pub use log::EventLog;
pub use subscriber::Subscribe;
