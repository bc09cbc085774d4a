//! State module for tracking check outcomes
//!
//! # Components
//!
//! - `CheckOutcome`: The closed set of outcomes a link can end in
//! - `ResultItem`: One checked link with its outcome
//! - `ResultStore`: Per-parent accumulation, deduplication and the run verdict

mod outcome;
mod result_store;

// Re-export main types
pub use outcome::{CheckOutcome, ResultItem};
pub use result_store::{PageResults, ResultStore, SEED_PARENT};
