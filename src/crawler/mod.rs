//! Crawler module for link discovery and probing
//!
//! This module contains the core checking logic, including:
//! - HTTP probing with HEAD/GET and per-probe timeouts
//! - HTML link extraction driven by match rules
//! - The LIFO frontier drained in waves
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_inspection, Inspector};
pub use fetcher::{build_http_client, HttpProbe, Method, Probe, ProbeFailure};
pub use parser::{extract_links, ExtractError, MatchRule, MatchRuleSet};
pub use scheduler::{Frontier, FrontierEntry};
