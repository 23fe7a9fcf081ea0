//! # Page cycling.
//!
//! A [`PageCycleGroup`] holds the pages registered on one control for one
//! [`Selector`]. Each activation moves to the next page, but only while the page
//! currently selected is still active:
//!
//! ```text
//! cursor == -1            ─► cursor = 0
//! pages[cursor].active    ─► cursor = (cursor + 1) mod N
//! pages[cursor].inactive  ─► cursor unchanged (re-select)
//! then: selector(pages[cursor])   (always, even when the cursor did not move)
//! ```
//!
//! A page that was superseded elsewhere is therefore re-selected instead of skipped.

use std::fmt;
use std::sync::Arc;

/// A selectable display/behaviour unit.
pub trait Page: Send + Sync {
    /// Number used in composite keys (`monitor_page-N`).
    fn page_number(&self) -> i32;

    /// Whether this page is the one currently shown by its consumer.
    fn is_active(&self) -> bool;
}

/// Shared page handle.
pub type PageRef = Arc<dyn Page>;

/// Function invoked with the page chosen by a group.
///
/// Groups are matched by selector **identity**: clones of one `Selector` feed the
/// same group, two selectors built from identical closures do not.
#[derive(Clone)]
pub struct Selector(Arc<dyn Fn(&PageRef) + Send + Sync>);

impl Selector {
    pub fn new(f: impl Fn(&PageRef) + Send + Sync + 'static) -> Self {
        Selector(Arc::new(f))
    }

    /// True if both handles point at the same selector.
    pub fn same_as(&self, other: &Selector) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }

    fn select(&self, page: &PageRef) {
        (self.0)(page)
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({:p})", Arc::as_ptr(&self.0))
    }
}

/// Cycling selection state for one selector on one control.
pub struct PageCycleGroup {
    selector: Selector,
    pages: Vec<PageRef>,
    cursor: isize,
}

impl PageCycleGroup {
    /// Creates a group that has not been advanced yet.
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            pages: Vec::new(),
            cursor: -1,
        }
    }

    pub fn with_page(mut self, page: PageRef) -> Self {
        self.pages.push(page);
        self
    }

    /// True if `selector` belongs to this group.
    pub fn accepts(&self, selector: &Selector) -> bool {
        self.selector.same_as(selector)
    }

    /// Appends a page; insertion order is activation order.
    pub fn push(&mut self, page: PageRef) {
        self.pages.push(page);
    }

    /// Selects the next page and hands it to the selector.
    ///
    /// Returns the selected page, or `None` for an empty group.
    pub fn advance(&mut self) -> Option<PageRef> {
        let len = self.pages.len();
        if len == 0 {
            return None;
        }

        let current_active = self.current().is_some_and(|page| page.is_active());
        if self.cursor < 0 || current_active {
            self.cursor = (self.cursor + 1).rem_euclid(len as isize);
        }

        let page = self.current()?.clone();
        self.selector.select(&page);
        Some(page)
    }

    /// Index of the selected page, `None` before the first advance.
    pub fn cursor(&self) -> Option<usize> {
        usize::try_from(self.cursor).ok()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    fn current(&self) -> Option<&PageRef> {
        self.cursor().and_then(|i| self.pages.get(i))
    }
}

impl fmt::Debug for PageCycleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageCycleGroup")
            .field("selector", &self.selector)
            .field("pages", &self.pages.iter().map(|p| p.page_number()).collect::<Vec<_>>())
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    pub(crate) struct TestPage {
        number: i32,
        active: AtomicBool,
    }

    impl TestPage {
        pub(crate) fn new(number: i32, active: bool) -> Arc<Self> {
            Arc::new(Self {
                number,
                active: AtomicBool::new(active),
            })
        }

        pub(crate) fn set_active(&self, active: bool) {
            self.active.store(active, Ordering::SeqCst);
        }
    }

    impl Page for TestPage {
        fn page_number(&self) -> i32 {
            self.number
        }

        fn is_active(&self) -> bool {
            self.active.load(Ordering::SeqCst)
        }
    }

    pub(crate) fn recording_selector() -> (Selector, Arc<Mutex<Vec<i32>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let selector = Selector::new(move |page| sink.lock().unwrap().push(page.page_number()));
        (selector, seen)
    }

    fn group(selector: &Selector, pages: &[Arc<TestPage>]) -> PageCycleGroup {
        let mut g = PageCycleGroup::new(selector.clone());
        for p in pages {
            g.push(p.clone());
        }
        g
    }

    #[test]
    fn test_empty_group_is_noop() {
        let (selector, seen) = recording_selector();
        let mut g = PageCycleGroup::new(selector);
        assert!(g.advance().is_none());
        assert_eq!(g.cursor(), None);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_wraparound_when_all_active() {
        let (selector, seen) = recording_selector();
        let pages = [TestPage::new(0, true), TestPage::new(1, true), TestPage::new(2, true)];
        let mut g = group(&selector, &pages);

        for _ in 0..4 {
            g.advance();
        }

        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 0]);
        assert_eq!(g.cursor(), Some(0));
    }

    #[test]
    fn test_inactive_page_is_reselected() {
        let (selector, seen) = recording_selector();
        let pages = [TestPage::new(0, false), TestPage::new(1, true), TestPage::new(2, true)];
        let mut g = group(&selector, &pages);

        for _ in 0..3 {
            g.advance();
        }

        assert_eq!(*seen.lock().unwrap(), vec![0, 0, 0]);
        assert_eq!(g.cursor(), Some(0));
    }

    #[test]
    fn test_advances_again_once_page_recovers() {
        let (selector, seen) = recording_selector();
        let pages = [TestPage::new(0, false), TestPage::new(1, true)];
        let mut g = group(&selector, &pages);

        g.advance();
        g.advance();
        pages[0].set_active(true);
        g.advance();

        assert_eq!(*seen.lock().unwrap(), vec![0, 0, 1]);
    }

    #[test]
    fn test_selector_identity() {
        let (a, _) = recording_selector();
        let (b, _) = recording_selector();
        let g = PageCycleGroup::new(a.clone()).with_page(TestPage::new(0, true));

        assert!(g.accepts(&a));
        assert!(!g.accepts(&b));
        assert_eq!(g.len(), 1);
    }
}
