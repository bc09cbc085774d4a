//! Outcome tallies shared by the reporters

use crate::state::{CheckOutcome, PageResults, ResultItem};
use std::ops::AddAssign;

/// Outcome counts for one parent page or a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageTally {
    /// Links that answered on the first attempt
    pub ok: u64,

    /// Links that answered after timeout retries
    pub retried: u64,

    /// Links excluded by policy
    pub skipped: u64,

    /// Links with a failure outcome
    pub broken: u64,
}

impl PageTally {
    /// Counts the outcomes of a page's items
    pub fn of(items: &[ResultItem]) -> Self {
        let mut tally = Self::default();
        for item in items {
            tally.record(item.outcome);
        }
        tally
    }

    /// Counts the outcomes of every page
    pub fn of_run(pages: &PageResults) -> Self {
        let mut tally = Self::default();
        for (_, items) in pages.iter() {
            tally += Self::of(items);
        }
        tally
    }

    /// Adds one outcome to the tally
    pub fn record(&mut self, outcome: CheckOutcome) {
        match outcome {
            CheckOutcome::Ok => self.ok += 1,
            CheckOutcome::Retried => self.retried += 1,
            CheckOutcome::Skipped => self.skipped += 1,
            CheckOutcome::Timeout | CheckOutcome::NonSuccessCode | CheckOutcome::GenericError => {
                self.broken += 1
            }
        }
    }

    /// Total number of counted items
    pub fn total(&self) -> u64 {
        self.ok + self.retried + self.skipped + self.broken
    }
}

impl AddAssign for PageTally {
    fn add_assign(&mut self, other: Self) {
        self.ok += other.ok;
        self.retried += other.retried;
        self.skipped += other.skipped;
        self.broken += other.broken;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<ResultItem> {
        vec![
            ResultItem::new("a", CheckOutcome::Ok),
            ResultItem::new("b", CheckOutcome::Ok),
            ResultItem::with_message("c", CheckOutcome::Retried, "1"),
            ResultItem::new("d", CheckOutcome::Skipped),
            ResultItem::new("e", CheckOutcome::Timeout),
            ResultItem::with_message("f", CheckOutcome::NonSuccessCode, "404"),
            ResultItem::new("g", CheckOutcome::GenericError),
        ]
    }

    #[test]
    fn test_tally_of_page() {
        let tally = PageTally::of(&items());
        assert_eq!(
            tally,
            PageTally {
                ok: 2,
                retried: 1,
                skipped: 1,
                broken: 3
            }
        );
        assert_eq!(tally.total(), 7);
    }

    #[test]
    fn test_tally_of_run() {
        let pages: PageResults = vec![("p1", items()), ("p2", items())].into_iter().collect();
        let tally = PageTally::of_run(&pages);
        assert_eq!(tally.ok, 4);
        assert_eq!(tally.broken, 6);
        assert_eq!(tally.total(), 14);
    }

    #[test]
    fn test_empty_tally() {
        assert_eq!(PageTally::of(&[]).total(), 0);
    }
}
