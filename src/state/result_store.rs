//! Result store: per-parent accumulation of check outcomes
//!
//! The store is shared by every task of a wave, so all mutation goes through
//! one mutex. Items are appended in completion order.

use crate::output::{ProgressObserver, Reporter};
use crate::state::{CheckOutcome, ResultItem};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Parent label used for seed URLs
pub const SEED_PARENT: &str = "original request";

/// Checked links grouped by the page they were found on
///
/// Parents keep the order in which they were first seen; items within a
/// parent keep the order in which they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResults {
    pages: Vec<(String, Vec<ResultItem>)>,
    index: HashMap<String, usize>,
}

impl PageResults {
    /// Creates an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item under the given parent
    pub fn push(&mut self, parent: &str, item: ResultItem) {
        match self.index.get(parent) {
            Some(&slot) => self.pages[slot].1.push(item),
            None => {
                self.index.insert(parent.to_string(), self.pages.len());
                self.pages.push((parent.to_string(), vec![item]));
            }
        }
    }

    /// Returns the items recorded under a parent
    pub fn get(&self, parent: &str) -> Option<&[ResultItem]> {
        self.index
            .get(parent)
            .map(|&slot| self.pages[slot].1.as_slice())
    }

    /// Iterates over `(parent, items)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ResultItem])> {
        self.pages
            .iter()
            .map(|(parent, items)| (parent.as_str(), items.as_slice()))
    }

    /// Number of parents
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns true if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total number of items across all parents
    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|(_, items)| items.len()).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<ResultItem>)> for PageResults {
    fn from_iter<I: IntoIterator<Item = (S, Vec<ResultItem>)>>(iter: I) -> Self {
        let mut pages = Self::new();
        for (parent, items) in iter {
            let parent = parent.into();
            for item in items {
                pages.push(&parent, item);
            }
        }
        pages
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    pages: PageResults,
    checked: HashSet<String>,
    broken: bool,
}

/// Accumulates outcomes for one run and tracks the pass/fail verdict
pub struct ResultStore {
    ignore_skipped: bool,
    progress: Option<Arc<dyn ProgressObserver>>,
    inner: Mutex<StoreInner>,
}

impl ResultStore {
    /// Creates an empty store
    ///
    /// # Arguments
    ///
    /// * `ignore_skipped` - Drop `Skipped` items instead of recording them
    pub fn new(ignore_skipped: bool) -> Self {
        Self {
            ignore_skipped,
            progress: None,
            inner: Mutex::new(StoreInner::default()),
        }
    }

    /// Attaches an observer notified once per recorded item
    pub fn with_progress(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.progress = Some(observer);
        self
    }

    /// Builds a store from already accumulated pages
    ///
    /// Useful for rendering saved results with a reporter.
    pub fn from_pages(pages: PageResults) -> Self {
        let checked = pages
            .iter()
            .flat_map(|(_, items)| items.iter().map(|item| item.url.clone()))
            .collect();
        let broken = pages
            .iter()
            .any(|(_, items)| items.iter().any(|item| item.outcome.is_failure()));

        Self {
            ignore_skipped: false,
            progress: None,
            inner: Mutex::new(StoreInner {
                pages,
                checked,
                broken,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records an outcome under its parent page
    ///
    /// No-op for `Skipped` items when skipped items are ignored. Otherwise the
    /// item is appended, its URL is marked checked and, for failure outcomes,
    /// the broken flag is raised. The flag never clears.
    pub fn add(&self, item: ResultItem, parent: &str) {
        if item.outcome == CheckOutcome::Skipped && self.ignore_skipped {
            return;
        }

        if let Some(progress) = &self.progress {
            progress.on_recorded(&item);
        }

        let mut inner = self.lock();
        inner.checked.insert(item.url.clone());
        if item.outcome.is_failure() {
            inner.broken = true;
        }
        inner.pages.push(parent, item);
    }

    /// Atomically marks a URL as checked
    ///
    /// # Returns
    ///
    /// * `true` - The caller is the first to claim this URL and must check it
    /// * `false` - The URL was already claimed or recorded
    pub fn claim(&self, url: &str) -> bool {
        self.lock().checked.insert(url.to_string())
    }

    /// Returns true if the URL has been claimed or recorded
    pub fn is_checked(&self, url: &str) -> bool {
        self.lock().checked.contains(url)
    }

    /// Total number of recorded items
    pub fn count(&self) -> usize {
        self.lock().pages.item_count()
    }

    /// Returns true iff no failure outcome was ever recorded
    pub fn success(&self) -> bool {
        !self.lock().broken
    }

    /// Returns a copy of the accumulated pages
    pub fn pages(&self) -> PageResults {
        self.lock().pages.clone()
    }

    /// Hands the accumulated pages to a reporter and returns what it produces
    pub fn report<R: Reporter>(&self, reporter: &R) -> R::Output {
        let inner = self.lock();
        reporter.process(&inner.pages)
    }

    /// Signals the progress observer that no more items will arrive
    pub fn finish(&self) {
        if let Some(progress) = &self.progress {
            progress.on_finished();
        }
    }
}

impl std::fmt::Debug for ResultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("ResultStore")
            .field("ignore_skipped", &self.ignore_skipped)
            .field("items", &inner.pages.item_count())
            .field("broken", &inner.broken)
            .finish()
    }
}
