//! # Control registry - identity, registration and dispatch.
//!
//! The registry owns every [`Control`] of a session and maps composite keys to
//! them. It is an explicit value built from a [`Bus`]; there is no process-wide
//! instance.
//!
//! ## Architecture
//! ```text
//! resolve(resolver, origin, "name|index")
//!     └─► TargetResolver::find_target ─► (owner, node) ─► ControlId (created once)
//!
//! register_as(id, caller surface, Registration)
//!     ├─► Control::attach       (page groups merge by selector)
//!     ├─► Control::bind         (ActivationContext, once per key)
//!     └─► keys[key] = id        (first control bound to a key keeps it)
//!
//! activate(id) ─► page groups ─► keyed ─► plain ─► Bus::emit(click, primary context)
//! release(id)  ─► keyed ─► plain ─► Bus::emit(release, primary context)
//! ```
//!
//! ## Rules
//! - One control per resolved target; one control per key.
//! - Keys carry the registering caller's surface, so callers sharing a
//!   container-scope control get distinct keys whatever the registration order.
//! - A key already bound to a different control still attaches its handler; the
//!   key keeps addressing the first control.
//! - One event per activation, built from the control's primary context, so a
//!   single press is replayed exactly once whatever the number of registrations.
//! - Handler panics propagate to the caller and suppress the emission.

use std::collections::HashMap;

use super::control::{Control, ControlId};
use super::handler::Registration;
use super::key::{ActivationContext, ControlKey};
use super::target::{NodeHandle, Origin, SurfaceId, TargetDescriptor, TargetResolver, locate};
use crate::config::Config;
use crate::error::{RegistryError, ResolveError};
use crate::events::{Bus, EventKind, OwnerId};

/// Session-owned registry of controls.
#[derive(Debug)]
pub struct ControlRegistry {
    bus: Bus,
    controls: Vec<Control>,
    by_target: HashMap<(OwnerId, NodeHandle), ControlId>,
    by_key: HashMap<String, ControlId>,
    delimiter: char,
}

impl ControlRegistry {
    /// Creates an empty registry publishing on `bus`.
    pub fn new(bus: Bus) -> Self {
        Self::with_config(bus, &Config::default())
    }

    pub fn with_config(bus: Bus, cfg: &Config) -> Self {
        Self {
            bus,
            controls: Vec::new(),
            by_target: HashMap::new(),
            by_key: HashMap::new(),
            delimiter: cfg.sub_target_delimiter,
        }
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Locates or creates the control for `descriptor`.
    ///
    /// Failures are logged and reported as `None`; "no control" is a normal outcome.
    pub fn resolve(
        &mut self,
        resolver: &dyn TargetResolver,
        origin: Origin,
        descriptor: &str,
    ) -> Option<ControlId> {
        self.resolve_logged(resolver, origin, descriptor).map(|(id, _)| id)
    }

    /// Like [`resolve`](Self::resolve) but returns the error.
    pub fn try_resolve(
        &mut self,
        resolver: &dyn TargetResolver,
        origin: Origin,
        descriptor: &str,
    ) -> Result<ControlId, ResolveError> {
        self.resolve_target(resolver, origin, descriptor).map(|(id, _)| id)
    }

    fn resolve_logged(
        &mut self,
        resolver: &dyn TargetResolver,
        origin: Origin,
        descriptor: &str,
    ) -> Option<(ControlId, SurfaceId)> {
        match self.resolve_target(resolver, origin, descriptor) {
            Ok(found) => Some(found),
            Err(err) => {
                tracing::error!(
                    target: "panelbus::registry",
                    error = %err,
                    label = err.as_label(),
                    descriptor,
                    surface = %origin.surface,
                    "could not register a control; check the configuration"
                );
                None
            }
        }
    }

    /// Returns the control and the surface id this caller addresses it by.
    ///
    /// The surface differs between callers sharing a container-scope control.
    fn resolve_target(
        &mut self,
        resolver: &dyn TargetResolver,
        origin: Origin,
        descriptor: &str,
    ) -> Result<(ControlId, SurfaceId), ResolveError> {
        let desc = TargetDescriptor::parse(descriptor, self.delimiter);
        let target = locate(resolver, origin, &desc)?;
        let surface = target.surface;

        let slot = (origin.owner, target.node);
        if let Some(&id) = self.by_target.get(&slot) {
            return Ok((id, surface));
        }

        let id = ControlId(self.controls.len());
        tracing::debug!(
            target: "panelbus::registry",
            ?id,
            control = %target.name,
            surface = %target.surface,
            node = target.node.0,
            "control created"
        );
        self.controls.push(Control::new(origin.owner, target));
        self.by_target.insert(slot, id);
        Ok((id, surface))
    }

    /// Attaches `registration` to control `id`, keyed by the surface the control
    /// was created from.
    ///
    /// See [`register_as`](Self::register_as).
    pub fn register(&mut self, id: ControlId, registration: Registration) -> Result<ControlKey, RegistryError> {
        let surface = self
            .controls
            .get(id.0)
            .map(Control::surface)
            .ok_or(RegistryError::UnknownControl(id))?;
        self.register_as(id, surface, registration)
    }

    /// Attaches `registration` to control `id` and returns the key it is addressed
    /// by, built from the caller's `surface`.
    ///
    /// Registering again under an existing key of the same control appends the
    /// handler; the key keeps mapping to that one control. When the key already
    /// maps to a different control the handler is still attached here, but the
    /// key keeps addressing the first control (a `KeyConflict` warning is logged).
    pub fn register_as(
        &mut self,
        id: ControlId,
        surface: SurfaceId,
        registration: Registration,
    ) -> Result<ControlKey, RegistryError> {
        let control = self.controls.get_mut(id.0).ok_or(RegistryError::UnknownControl(id))?;
        let key = ControlKey::new(control.owner(), surface, control.name(), registration.discriminator());
        let text = key.to_string();

        let kind = registration.kind();
        control.attach(registration);
        control.bind(ActivationContext::new(key.clone()));

        match self.by_key.get(&text).copied() {
            Some(existing) if existing != id => {
                let err = RegistryError::KeyConflict { key: text, existing };
                tracing::warn!(
                    target: "panelbus::registry",
                    error = %err,
                    label = err.as_label(),
                    ?id,
                    "handler attached; key keeps addressing the first control"
                );
            }
            Some(_) => {}
            None => {
                self.by_key.insert(text, id);
            }
        }

        tracing::debug!(target: "panelbus::registry", key = %key, ?kind, "handler registered");
        Ok(key)
    }

    /// Resolves `descriptor` and registers on the result in one step, keyed by
    /// the caller's own surface.
    pub fn bind(
        &mut self,
        resolver: &dyn TargetResolver,
        origin: Origin,
        descriptor: &str,
        registration: Registration,
    ) -> Option<ControlKey> {
        let (id, surface) = self.resolve_logged(resolver, origin, descriptor)?;
        self.register_as(id, surface, registration).ok()
    }

    /// Exact-match key lookup.
    pub fn lookup_by_key(&self, key: &str) -> Option<ControlId> {
        self.by_key.get(key).copied()
    }

    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.controls.get(id.0)
    }

    pub(crate) fn control_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.controls.get_mut(id.0)
    }

    /// Runs the activation path of `id` and emits a `click` event.
    pub fn activate(&mut self, id: ControlId) -> Result<(), RegistryError> {
        let control = self.controls.get_mut(id.0).ok_or(RegistryError::UnknownControl(id))?;
        control.run_activation();
        if let Some(ctx) = control.primary() {
            self.bus.emit(ctx.event(EventKind::Click));
        }
        Ok(())
    }

    /// Runs the release path of `id` and emits a `release` event.
    pub fn release(&mut self, id: ControlId) -> Result<(), RegistryError> {
        let control = self.controls.get(id.0).ok_or(RegistryError::UnknownControl(id))?;
        control.run_release();
        if let Some(ctx) = control.primary() {
            self.bus.emit(ctx.event(EventKind::Release));
        }
        Ok(())
    }

    /// Number of controls.
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.by_key.len()
    }
}
