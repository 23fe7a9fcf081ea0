//! # Handler model.
//!
//! Three handler mechanisms can be attached to one control, in any combination:
//!
//! | Kind          | Activation                        | Release                 |
//! |---------------|-----------------------------------|-------------------------|
//! | `PageTrigger` | advance the page group            | nothing                 |
//! | `Keyed`       | `on_activate(numeric_id)`         | `on_release(numeric_id)`|
//! | `Plain`       | `on_activate()`                   | `on_release()` if any   |
//!
//! A control runs its handlers stage by stage ([`HandlerKind::ORDER`]): every page
//! group first, then keyed handlers, then plain handlers; registration order is
//! kept within a stage.

use std::fmt;
use std::sync::Arc;

use super::key::Discriminator;
use super::page::{PageCycleGroup, PageRef, Selector};

/// Plain callback.
pub type PlainFn = Arc<dyn Fn() + Send + Sync>;

/// Callback bound to a numeric id.
pub type KeyedFn = Arc<dyn Fn(i32) + Send + Sync>;

/// Stage a handler runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandlerKind {
    PageTrigger,
    Keyed,
    Plain,
}

impl HandlerKind {
    /// Activation order.
    pub const ORDER: [HandlerKind; 3] = [HandlerKind::PageTrigger, HandlerKind::Keyed, HandlerKind::Plain];
}

/// What a caller asks the registry to attach.
#[derive(Clone)]
pub enum Registration {
    /// Add `page` to the group driven by `selector`.
    PageTrigger { selector: Selector, page: PageRef },
    /// Invoke callbacks with a bound numeric id.
    Keyed {
        numeric_id: i32,
        on_activate: KeyedFn,
        on_release: KeyedFn,
    },
    /// Invoke callbacks with no arguments.
    Plain {
        on_activate: PlainFn,
        on_release: Option<PlainFn>,
    },
}

impl Registration {
    pub fn page_trigger(selector: &Selector, page: PageRef) -> Self {
        Registration::PageTrigger {
            selector: selector.clone(),
            page,
        }
    }

    pub fn keyed<A, R>(numeric_id: i32, on_activate: A, on_release: R) -> Self
    where
        A: Fn(i32) + Send + Sync + 'static,
        R: Fn(i32) + Send + Sync + 'static,
    {
        Registration::Keyed {
            numeric_id,
            on_activate: Arc::new(on_activate),
            on_release: Arc::new(on_release),
        }
    }

    pub fn plain<A>(on_activate: A) -> Self
    where
        A: Fn() + Send + Sync + 'static,
    {
        Registration::Plain {
            on_activate: Arc::new(on_activate),
            on_release: None,
        }
    }

    pub fn plain_with_release<A, R>(on_activate: A, on_release: R) -> Self
    where
        A: Fn() + Send + Sync + 'static,
        R: Fn() + Send + Sync + 'static,
    {
        Registration::Plain {
            on_activate: Arc::new(on_activate),
            on_release: Some(Arc::new(on_release)),
        }
    }

    pub fn kind(&self) -> HandlerKind {
        match self {
            Registration::PageTrigger { .. } => HandlerKind::PageTrigger,
            Registration::Keyed { .. } => HandlerKind::Keyed,
            Registration::Plain { .. } => HandlerKind::Plain,
        }
    }

    /// Key suffix this registration is addressed by.
    pub fn discriminator(&self) -> Discriminator {
        match self {
            Registration::PageTrigger { page, .. } => Discriminator::Page(page.page_number()),
            Registration::Keyed { numeric_id, .. } => Discriminator::Keyed(*numeric_id),
            Registration::Plain { .. } => Discriminator::Plain,
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Registration::{:?}({})", self.kind(), self.discriminator())
    }
}

/// A handler attached to a control.
pub enum Handler {
    PageTrigger(PageCycleGroup),
    Keyed {
        numeric_id: i32,
        on_activate: KeyedFn,
        on_release: KeyedFn,
    },
    Plain {
        on_activate: PlainFn,
        on_release: Option<PlainFn>,
    },
}

impl Handler {
    pub fn kind(&self) -> HandlerKind {
        match self {
            Handler::PageTrigger(_) => HandlerKind::PageTrigger,
            Handler::Keyed { .. } => HandlerKind::Keyed,
            Handler::Plain { .. } => HandlerKind::Plain,
        }
    }

    pub fn activate(&mut self) {
        match self {
            Handler::PageTrigger(group) => {
                group.advance();
            }
            Handler::Keyed {
                numeric_id,
                on_activate,
                ..
            } => on_activate(*numeric_id),
            Handler::Plain { on_activate, .. } => on_activate(),
        }
    }

    pub fn release(&self) {
        match self {
            Handler::PageTrigger(_) => {}
            Handler::Keyed {
                numeric_id,
                on_release,
                ..
            } => on_release(*numeric_id),
            Handler::Plain { on_release, .. } => {
                if let Some(release) = on_release {
                    release();
                }
            }
        }
    }

    /// Page group, for page-trigger handlers.
    pub fn page_group(&self) -> Option<&PageCycleGroup> {
        match self {
            Handler::PageTrigger(group) => Some(group),
            _ => None,
        }
    }
}

impl From<Registration> for Handler {
    fn from(value: Registration) -> Self {
        match value {
            Registration::PageTrigger { selector, page } => {
                Handler::PageTrigger(PageCycleGroup::new(selector).with_page(page))
            }
            Registration::Keyed {
                numeric_id,
                on_activate,
                on_release,
            } => Handler::Keyed {
                numeric_id,
                on_activate,
                on_release,
            },
            Registration::Plain {
                on_activate,
                on_release,
            } => Handler::Plain {
                on_activate,
                on_release,
            },
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::PageTrigger(group) => f.debug_tuple("PageTrigger").field(group).finish(),
            Handler::Keyed { numeric_id, .. } => f.debug_struct("Keyed").field("numeric_id", numeric_id).finish(),
            Handler::Plain { on_release, .. } => f
                .debug_struct("Plain")
                .field("has_release", &on_release.is_some())
                .finish(),
        }
    }
}
