//! Configuration module for Link-Inspector
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an absent file is equivalent to `Config::default()`.
//!
//! # Example
//!
//! ```no_run
//! use link_inspector::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("inspector.toml")).unwrap();
//! println!("Retries per timed-out link: {}", config.crawler.max_retries);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_MS};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
