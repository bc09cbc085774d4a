//! Outcome definitions for checked links
//!
//! Every link reference the engine encounters ends in exactly one of these outcomes.

use std::fmt;

/// The classified result of checking one link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckOutcome {
    // ===== Healthy =====
    /// Link responded successfully on the first attempt
    Ok,

    /// Link responded successfully after at least one timeout retry
    Retried,

    // ===== Not probed =====
    /// Link excluded by policy (already checked, ignored scheme, skip pattern)
    Skipped,

    // ===== Broken =====
    /// Link timed out on every allowed attempt
    Timeout,

    /// Link answered with a status code that is neither 2xx nor accepted
    NonSuccessCode,

    /// Link could not be resolved or reached at all
    GenericError,
}

impl CheckOutcome {
    /// Returns true if this outcome marks the run as failed
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::NonSuccessCode | Self::GenericError
        )
    }

    /// Returns true if the link was reachable
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Ok | Self::Retried)
    }

    /// Returns the short label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Retried => "RETRIED",
            Self::Skipped => "SKIP",
            Self::Timeout => "TIMEOUT",
            Self::NonSuccessCode => "ERROR CODE",
            Self::GenericError => "UNKNOWN",
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One checked link and its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    /// Canonical URL of the link (the raw reference if it could not be canonicalized)
    pub url: String,

    /// The classified outcome
    pub outcome: CheckOutcome,

    /// Extra detail: the status code, the retry count, or an error description
    pub message: Option<String>,
}

impl ResultItem {
    /// Creates an item without a message
    pub fn new(url: impl Into<String>, outcome: CheckOutcome) -> Self {
        Self {
            url: url.into(),
            outcome,
            message: None,
        }
    }

    /// Creates an item carrying a message
    pub fn with_message(
        url: impl Into<String>,
        outcome: CheckOutcome,
        message: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            outcome,
            message: Some(message.into()),
        }
    }
}
