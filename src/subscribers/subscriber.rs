//! # Event subscriber trait.
//!
//! Provides [`Subscribe`] an extension point for plugging observers into the
//! [`Bus`](crate::Bus).
//!
//! ## Rules
//! - `on_event` runs **synchronously** inside `Bus::emit`, on the emitter's stack.
//! - Events arrive in emission order.
//! - A subscriber must not emit on the same bus from `on_event` (unbounded recursion).
//! - A panic inside `on_event` propagates to the emitter; handle errors internally.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use panelbus::{Event, Subscribe};
//!
//! #[derive(Default)]
//! struct Clicks(AtomicUsize);
//!
//! impl Subscribe for Clicks {
//!     fn on_event(&self, ev: &Event) {
//!         if ev.is_click() {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "clicks" }
//! }
//! ```

use crate::events::Event;

/// Event subscriber for activation observability.
///
/// ### Implementation requirements
/// - Keep `on_event` short; it blocks the activation that emitted the event.
/// - Do not feed back into dispatch (no `activate`/`replay` from here).
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
