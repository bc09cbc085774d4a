//! Reporter traits and types
//!
//! This module defines the interface reporters implement and the closed set
//! of reporter kinds selectable from configuration or the command line.

use crate::state::PageResults;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for result reporters
///
/// A reporter receives the accumulated results read-only once the crawl is
/// over. What it produces is up to the implementation: a side effect such
/// as printing, a rendered document, or both.
pub trait Reporter {
    /// What processing the results yields
    type Output;

    /// Renders or otherwise consumes the accumulated results
    ///
    /// # Arguments
    ///
    /// * `pages` - Checked links grouped by parent page
    fn process(&self, pages: &PageResults) -> Self::Output;
}

/// The reporters available at the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReporterKind {
    /// Human-readable text on stdout
    Console,
    /// JUnit-style XML document
    Junit,
}

impl FromStr for ReporterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "junit" => Ok(Self::Junit),
            other => Err(format!(
                "unknown reporter '{}' (expected 'console' or 'junit')",
                other
            )),
        }
    }
}

impl fmt::Display for ReporterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => f.write_str("console"),
            Self::Junit => f.write_str("junit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_kind_from_str() {
        assert_eq!("console".parse::<ReporterKind>(), Ok(ReporterKind::Console));
        assert_eq!(" JUnit ".parse::<ReporterKind>(), Ok(ReporterKind::Junit));
        assert!("html".parse::<ReporterKind>().is_err());
    }

    #[test]
    fn test_reporter_kind_display_round_trips() {
        for kind in [ReporterKind::Console, ReporterKind::Junit] {
            assert_eq!(kind.to_string().parse::<ReporterKind>(), Ok(kind));
        }
    }
}
