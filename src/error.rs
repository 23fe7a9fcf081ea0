//! Error types used by the registry and the replay engine.
//!
//! This module defines three enums:
//!
//! - [`ResolveError`] - a target descriptor could not be turned into a control.
//! - [`RegistryError`] - a registration could not be attached to a control.
//! - [`ReplayError`] - an inbound event could not be replayed.
//!
//! All of them are **local** failures: they degrade one control or one event and
//! never the session. Each provides `as_label` for logs/metrics.
//!
//! Panics raised inside registered handlers are not represented here; they
//! propagate to whoever called `activate`, `release` or `replay`.

use thiserror::Error;

use crate::controls::ControlId;

/// # Errors produced while resolving a target descriptor.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The resolver has no target with this name in the requested scope.
    #[error("could not find a target named '{name}' in {scope}")]
    TargetNotFound {
        /// Trimmed target name.
        name: String,
        /// Human-readable scope (`surface 3`, `container`).
        scope: String,
    },

    /// The `"name|index"` suffix does not address an existing sub-target.
    ///
    /// Non-fatal: resolution falls back to the un-indexed name.
    #[error("could not find a sub-target with index '{index}'")]
    InvalidSubTarget {
        /// Raw index text as written in the descriptor.
        index: String,
    },
}

impl ResolveError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use panelbus::ResolveError;
    ///
    /// let err = ResolveError::InvalidSubTarget { index: "9".into() };
    /// assert_eq!(err.as_label(), "resolve_invalid_sub_target");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ResolveError::TargetNotFound { .. } => "resolve_target_not_found",
            ResolveError::InvalidSubTarget { .. } => "resolve_invalid_sub_target",
        }
    }
}

/// # Errors produced while attaching a registration to a control.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The control id was not issued by this registry.
    #[error("unknown control {0:?}")]
    UnknownControl(ControlId),

    /// The composite key is already bound to a different control.
    ///
    /// Non-fatal: logged while the handler is still attached.
    #[error("key '{key}' is already bound to {existing:?}")]
    KeyConflict {
        /// Composite key string.
        key: String,
        /// Control that owns the key.
        existing: ControlId,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::UnknownControl(_) => "registry_unknown_control",
            RegistryError::KeyConflict { .. } => "registry_key_conflict",
        }
    }
}

/// # Errors produced while replaying an event.
///
/// A failed replay affects only that event; queued replays continue.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// No control is registered under the event's composite key.
    #[error("unknown control for key '{key}'")]
    UnknownKey {
        /// Composite key derived from the event.
        key: String,
    },

    /// The event kind is neither `click` nor `release`.
    #[error("unknown event kind '{kind}'")]
    UnknownKind {
        /// Kind as received.
        kind: String,
    },
}

impl ReplayError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use panelbus::ReplayError;
    ///
    /// let err = ReplayError::UnknownKind { kind: "hover".into() };
    /// assert_eq!(err.as_label(), "replay_unknown_kind");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ReplayError::UnknownKey { .. } => "replay_unknown_key",
            ReplayError::UnknownKind { .. } => "replay_unknown_kind",
        }
    }
}
