//! Output module for rendering check results
//!
//! This module handles:
//! - Printing the console summary
//! - Writing JUnit XML reports
//! - Streaming per-item progress while a run is in flight

mod console;
mod junit;
mod progress;
pub mod stats;
mod traits;

pub use console::{format_console_report, ConsoleReporter};
pub use junit::{format_junit_report, write_junit_report, JunitReporter};
pub use progress::{DotProgress, ProgressObserver};
pub use stats::PageTally;
pub use traits::{OutputError, OutputResult, Reporter, ReporterKind};
