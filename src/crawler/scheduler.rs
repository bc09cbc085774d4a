//! Frontier of pending link checks
//!
//! The frontier is a LIFO stack shared by every task of a wave. Entries
//! discovered deeper in the crawl are popped before siblings queued earlier,
//! so each discovered subtree tends to complete before the backlog is
//! revisited.

use crate::crawler::fetcher::Method;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One pending check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The reference as found, not yet canonicalized
    pub url: String,

    /// Requested probe method
    pub method: Method,

    /// Timeout retries already spent
    pub attempt: u32,

    /// Canonical URL of the page the reference was found on; `None` for seeds
    pub parent: Option<String>,

    /// Set on entries re-enqueued by escalation or retry, which must not be
    /// deduplicated against their own earlier attempt
    pub requeued: bool,
}

impl FrontierEntry {
    /// Creates a seed entry
    pub fn seed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::Get,
            attempt: 0,
            parent: None,
            requeued: false,
        }
    }

    /// Creates an entry for a reference discovered on `parent`
    pub fn discovered(url: impl Into<String>, method: Method, parent: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            attempt: 0,
            parent: Some(parent.into()),
            requeued: false,
        }
    }

    /// The same entry upgraded to GET after a failed HEAD probe
    pub fn escalated(&self) -> Self {
        Self {
            method: Method::Get,
            requeued: true,
            ..self.clone()
        }
    }

    /// The same entry after a timed-out probe
    pub fn retried(&self) -> Self {
        Self {
            attempt: self.attempt + 1,
            requeued: true,
            ..self.clone()
        }
    }
}

/// Concurrency-safe LIFO stack of pending entries
#[derive(Debug, Default)]
pub struct Frontier {
    stack: Mutex<Vec<FrontierEntry>>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<FrontierEntry>> {
        self.stack.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pushes an entry on top of the stack
    pub fn push(&self, entry: FrontierEntry) {
        self.lock().push(entry);
    }

    /// Pushes several entries; the last one ends up on top
    pub fn extend(&self, entries: impl IntoIterator<Item = FrontierEntry>) {
        self.lock().extend(entries);
    }

    /// Pops the top entry
    pub fn pop(&self) -> Option<FrontierEntry> {
        self.lock().pop()
    }

    /// Takes a snapshot of the top of the stack for one wave
    ///
    /// Entries come back in pop order. Anything pushed afterwards is only
    /// seen by the next call.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum entries to take; 0 takes the whole stack
    pub fn drain_wave(&self, limit: usize) -> Vec<FrontierEntry> {
        let mut stack = self.lock();
        let start = if limit == 0 {
            0
        } else {
            stack.len().saturating_sub(limit)
        };
        let mut wave: Vec<FrontierEntry> = stack.drain(start..).collect();
        wave.reverse();
        wave
    }

    /// Number of pending entries
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
