//! A registered control and its dispatch paths.

use super::handler::{Handler, HandlerKind, Registration};
use super::key::ActivationContext;
use super::page::PageCycleGroup;
use super::target::{NodeHandle, ResolvedTarget, SurfaceId};
use crate::events::OwnerId;

/// Index of a control inside its [`ControlRegistry`](super::ControlRegistry).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(pub(crate) usize);

/// One clickable target with every handler attached to it.
///
/// `contexts` holds one [`ActivationContext`] per distinct key registered on the
/// control; the first one is the primary context used for emission.
#[derive(Debug)]
pub struct Control {
    owner: OwnerId,
    surface: SurfaceId,
    name: String,
    node: NodeHandle,
    handlers: Vec<Handler>,
    contexts: Vec<ActivationContext>,
}

impl Control {
    pub(crate) fn new(owner: OwnerId, target: ResolvedTarget) -> Self {
        Self {
            owner,
            surface: target.surface,
            name: target.name,
            node: target.node,
            handlers: Vec::new(),
            contexts: Vec::new(),
        }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node(&self) -> NodeHandle {
        self.node
    }

    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }

    /// Number of handlers of `kind` (a page group counts once).
    pub fn count(&self, kind: HandlerKind) -> usize {
        self.handlers.iter().filter(|h| h.kind() == kind).count()
    }

    pub fn page_groups(&self) -> impl Iterator<Item = &PageCycleGroup> {
        self.handlers.iter().filter_map(Handler::page_group)
    }

    /// Keys bound to this control, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.contexts.iter().map(ActivationContext::key_text)
    }

    /// Context used to build emitted events.
    pub fn primary(&self) -> Option<&ActivationContext> {
        self.contexts.first()
    }

    /// Attaches a registration. Page triggers join the group with the same
    /// selector when one exists.
    pub(crate) fn attach(&mut self, registration: Registration) {
        if let Registration::PageTrigger { selector, page } = &registration {
            let existing = self.handlers.iter_mut().find_map(|h| match h {
                Handler::PageTrigger(group) if group.accepts(selector) => Some(group),
                _ => None,
            });
            if let Some(group) = existing {
                group.push(page.clone());
                return;
            }
        }
        self.handlers.push(Handler::from(registration));
    }

    /// Binds a context unless its key is already bound. Returns `true` if added.
    pub(crate) fn bind(&mut self, ctx: ActivationContext) -> bool {
        if self.contexts.iter().any(|c| c.key_text() == ctx.key_text()) {
            return false;
        }
        self.contexts.push(ctx);
        true
    }

    /// Activation path without emission: page groups, keyed, plain.
    pub(crate) fn run_activation(&mut self) {
        for stage in HandlerKind::ORDER {
            for handler in self.handlers.iter_mut().filter(|h| h.kind() == stage) {
                handler.activate();
            }
        }
    }

    /// Release path without emission: keyed, plain. Page groups are not touched.
    pub(crate) fn run_release(&self) {
        for stage in HandlerKind::ORDER {
            for handler in self.handlers.iter().filter(|h| h.kind() == stage) {
                handler.release();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::key::{ControlKey, Discriminator};
    use crate::controls::page::tests::{TestPage, recording_selector};
    use std::sync::{Arc, Mutex};

    fn control() -> Control {
        Control::new(
            OwnerId::NONE,
            ResolvedTarget {
                node: NodeHandle(1),
                surface: SurfaceId(0),
                name: "Btn".into(),
            },
        )
    }

    #[test]
    fn test_stage_order_ignores_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (plain, keyed) = (order.clone(), order.clone());
        let sel_order = order.clone();
        let selector = crate::controls::page::Selector::new(move |_| sel_order.lock().unwrap().push("page"));

        let mut c = control();
        c.attach(Registration::plain(move || plain.lock().unwrap().push("plain")));
        c.attach(Registration::keyed(1, move |_| keyed.lock().unwrap().push("keyed"), |_| {}));
        c.attach(Registration::page_trigger(&selector, TestPage::new(0, true)));

        c.run_activation();

        assert_eq!(*order.lock().unwrap(), vec!["page", "keyed", "plain"]);
    }

    #[test]
    fn test_same_selector_merges_into_one_group() {
        let (a, _) = recording_selector();
        let (b, _) = recording_selector();
        let mut c = control();

        c.attach(Registration::page_trigger(&a, TestPage::new(0, true)));
        c.attach(Registration::page_trigger(&a, TestPage::new(1, true)));
        c.attach(Registration::page_trigger(&b, TestPage::new(2, true)));

        let sizes: Vec<_> = c.page_groups().map(PageCycleGroup::len).collect();
        assert_eq!(sizes, vec![2, 1]);
    }

    #[test]
    fn test_release_does_not_advance_pages() {
        let (selector, seen) = recording_selector();
        let mut c = control();
        c.attach(Registration::page_trigger(&selector, TestPage::new(0, true)));

        c.run_release();

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(c.page_groups().next().and_then(PageCycleGroup::cursor), None);
    }

    #[test]
    fn test_bind_dedupes_keys() {
        let mut c = control();
        let key = ControlKey::new(OwnerId::NONE, SurfaceId(0), "Btn", Discriminator::Plain);

        assert!(c.bind(ActivationContext::new(key.clone())));
        assert!(!c.bind(ActivationContext::new(key)));
        assert_eq!(c.keys().count(), 1);
    }
}
