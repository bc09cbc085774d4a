//! URL handling module for Link-Inspector
//!
//! This module provides URL canonicalization, skip-pattern matching, and the
//! policy that decides which links are never probed.

mod matcher;
mod normalize;

use crate::config::CrawlerConfig;
use crate::ConfigError;

// Re-export main types
pub use matcher::SkipPatterns;
pub use normalize::{canonicalize, CanonicalUrl};

/// Why a link is excluded from probing by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exclusion {
    /// The URL scheme is one of the ignored prefixes (mailto, tel, ...)
    IgnoredPrefix,
    /// The URL matches a configured skip pattern
    SkipPattern,
}

/// Configured link exclusion rules
#[derive(Debug, Clone, Default)]
pub struct LinkFilter {
    ignored_prefixes: Vec<String>,
    skip: SkipPatterns,
}

impl LinkFilter {
    /// Builds the filter from crawler configuration
    pub fn new(config: &CrawlerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            ignored_prefixes: config.ignored_prefixes.clone(),
            skip: SkipPatterns::compile(&config.skip)?,
        })
    }

    /// Classifies a canonical URL against the exclusion rules
    ///
    /// Ignored prefixes are checked before skip patterns.
    ///
    /// # Returns
    ///
    /// * `Some(Exclusion)` - The URL must not be probed
    /// * `None` - The URL may be probed
    pub fn exclusion(&self, url: &CanonicalUrl) -> Option<Exclusion> {
        if self
            .ignored_prefixes
            .iter()
            .any(|prefix| url.has_scheme_prefix(prefix))
        {
            return Some(Exclusion::IgnoredPrefix);
        }

        if self.skip.matches(url.as_str()) {
            return Some(Exclusion::SkipPattern);
        }

        None
    }
}
