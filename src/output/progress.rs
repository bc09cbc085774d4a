//! Per-item progress notification
//!
//! The engine performs no I/O itself. Observers attached to the result store
//! are told about every recorded item as it happens.

use crate::state::ResultItem;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Characters per progress line
const LINE_WIDTH: usize = 80;

/// Receives one notification per recorded result item
pub trait ProgressObserver: Send + Sync {
    /// Called once for every item the result store records
    fn on_recorded(&self, item: &ResultItem);

    /// Called once when the run is over
    fn on_finished(&self) {}
}

/// Writes `x` for failed items and `.` for everything else
///
/// Lines wrap every 80 characters. Write errors are ignored; progress is
/// cosmetic.
#[derive(Debug)]
pub struct DotProgress<W> {
    state: Mutex<DotState<W>>,
}

#[derive(Debug)]
struct DotState<W> {
    out: W,
    written: usize,
}

impl DotProgress<io::Stderr> {
    /// Progress on stderr, keeping stdout free for reports
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> DotProgress<W> {
    /// Creates an observer writing to `out`
    pub fn new(out: W) -> Self {
        Self {
            state: Mutex::new(DotState { out, written: 0 }),
        }
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .out
    }
}

impl<W: Write + Send> ProgressObserver for DotProgress<W> {
    fn on_recorded(&self, item: &ResultItem) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if state.written > 0 && state.written % LINE_WIDTH == 0 {
            let _ = state.out.write_all(b"\n");
        }
        let mark: &[u8] = if item.outcome.is_failure() { b"x" } else { b"." };
        let _ = state.out.write_all(mark);
        let _ = state.out.flush();
        state.written += 1;
    }

    fn on_finished(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.written > 0 {
            let _ = state.out.write_all(b"\n");
            let _ = state.out.flush();
        }
    }
}
