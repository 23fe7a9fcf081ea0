//! # Target resolution.
//!
//! Controls are attached to *targets*: nodes supplied by a host-side
//! [`TargetResolver`] (a scene graph, a widget tree, a test double). The registry
//! never inspects geometry; it only asks the resolver for a [`NodeHandle`].
//!
//! ## Descriptors
//! A descriptor is a target name with an optional sub-target index:
//! ```text
//! "Throttle"        → name "Throttle" in the origin surface
//! "Throttle|2"      → name "Throttle" in sub-target 2 (key uses surface 2)
//! "Throttle|-1"     → name "Throttle" in the container namespace
//! "Throttle|99"     → invalid index: warning, falls back to "Throttle" in the origin surface
//! ```

use std::fmt;

use crate::error::ResolveError;
use crate::events::OwnerId;

/// Identifier of a control surface (a prop on a panel) within its container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub i32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle of a resolved node.
///
/// Must be unique per owner: two descriptors that resolve to the same handle
/// share one control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub u64);

/// Namespace a name is looked up in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Nodes belonging to one control surface.
    Surface(SurfaceId),
    /// Nodes belonging to the container itself.
    Container,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Surface(id) => write!(f, "surface {id}"),
            Scope::Container => f.write_str("container"),
        }
    }
}

/// Who is registering: the owning container and the calling surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Origin {
    pub owner: OwnerId,
    pub surface: SurfaceId,
}

impl Origin {
    pub fn new(owner: OwnerId, surface: i32) -> Self {
        Self {
            owner,
            surface: SurfaceId(surface),
        }
    }
}

/// Host-side lookup of nodes by name.
pub trait TargetResolver {
    /// Number of addressable sub-targets (surfaces) in the container.
    fn sub_target_count(&self) -> usize;

    /// Finds the node called `name` in `scope`, or `None` if it does not exist.
    fn find_target(&self, scope: Scope, name: &str) -> Option<NodeHandle>;
}

/// Parsed `"name"` / `"name|index"` descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetDescriptor {
    /// Trimmed target name.
    pub name: String,
    /// Raw sub-target index text, if the descriptor had one.
    pub index: Option<String>,
}

impl TargetDescriptor {
    /// Splits `raw` on `delimiter`. Only a single delimiter introduces an index;
    /// anything else is taken as a plain name.
    pub fn parse(raw: &str, delimiter: char) -> Self {
        let mut tokens = raw.split(delimiter);
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(name), Some(index), None) => Self {
                name: name.trim().to_string(),
                index: Some(index.trim().to_string()),
            },
            _ => Self {
                name: raw.trim().to_string(),
                index: None,
            },
        }
    }
}

/// Outcome of a successful resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub node: NodeHandle,
    /// Surface id used in composite keys.
    pub surface: SurfaceId,
    pub name: String,
}

/// Applies the sub-target redirect and asks the resolver for the node.
pub(crate) fn locate(
    resolver: &dyn TargetResolver,
    origin: Origin,
    desc: &TargetDescriptor,
) -> Result<ResolvedTarget, ResolveError> {
    let mut scope = Scope::Surface(origin.surface);
    let mut surface = origin.surface;

    if let Some(raw) = &desc.index {
        match raw.parse::<i32>() {
            Ok(index) if index < 0 => scope = Scope::Container,
            Ok(index) if (index as usize) < resolver.sub_target_count() => {
                surface = SurfaceId(index);
                scope = Scope::Surface(surface);
            }
            _ => {
                let err = ResolveError::InvalidSubTarget { index: raw.clone() };
                tracing::warn!(
                    target: "panelbus::registry",
                    error = %err,
                    label = err.as_label(),
                    target_name = %desc.name,
                    "falling back to un-indexed name"
                );
            }
        }
    }

    let node = resolver
        .find_target(scope, &desc.name)
        .ok_or_else(|| ResolveError::TargetNotFound {
            name: desc.name.clone(),
            scope: scope.to_string(),
        })?;

    Ok(ResolvedTarget {
        node,
        surface,
        name: desc.name.clone(),
    })
}
