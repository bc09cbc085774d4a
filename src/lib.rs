//! Link-Inspector: a concurrent broken-link checker
//!
//! This crate fetches one or more seed pages, extracts their outbound references,
//! optionally follows references that stay on the seed's origin, and classifies
//! every reference as healthy, broken, skipped or retried.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Link-Inspector operations
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid skip pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid match rule: {0}")]
    UnknownRule(#[from] crawler::ExtractError),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Result type alias for Link-Inspector operations
pub type Result<T> = std::result::Result<T, InspectError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_inspection, Inspector};
pub use state::{CheckOutcome, ResultItem, ResultStore};
pub use crate::url::{canonicalize, CanonicalUrl};
