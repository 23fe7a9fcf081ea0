//! Controls: targets, keys, handlers, page cycling and the registry.
//!
//! ## Contents
//! - [`ControlRegistry`] resolve / register / lookup / activate / release
//! - [`Control`], [`ControlId`] a registered control
//! - [`Registration`], [`Handler`], [`HandlerKind`] the three handler mechanisms
//! - [`PageCycleGroup`], [`Page`], [`Selector`] page cycling state machine
//! - [`ControlKey`], [`Discriminator`], [`ActivationContext`] composite keys
//! - [`TargetResolver`], [`TargetDescriptor`], [`Origin`] host-side target lookup

mod control;
mod handler;
mod key;
mod page;
mod registry;
mod target;

pub use control::{Control, ControlId};
pub use handler::{Handler, HandlerKind, KeyedFn, PlainFn, Registration};
pub use key::{ActivationContext, ControlKey, Discriminator};
pub use page::{Page, PageCycleGroup, PageRef, Selector};
pub use registry::ControlRegistry;
pub use target::{NodeHandle, Origin, ResolvedTarget, Scope, SurfaceId, TargetDescriptor, TargetResolver};

#[cfg(test)]
pub(crate) use page::tests as page_fixtures;
#[cfg(test)]
pub(crate) use registry::tests as registry_fixtures;
