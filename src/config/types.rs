use crate::output::ReporterKind;
use serde::Deserialize;

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// Default number of timeout retries per link
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Main configuration structure for Link-Inspector
///
/// Every key is optional; a missing section falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// Crawl engine behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Per-request timeout (milliseconds)
    pub timeout: u64,

    /// Status codes outside 200-299 that still count as healthy
    pub accepted_codes: Vec<u16>,

    /// URL scheme prefixes (without ':') that are never probed
    pub ignored_prefixes: Vec<String>,

    /// Substring or glob patterns for URLs that are never probed
    pub skip: Vec<String>,

    /// How many times a timed-out GET is retried
    pub max_retries: u32,

    /// Use GET instead of HEAD for links that are not expanded
    pub get: bool,

    /// Leave skipped links out of the results
    pub ignore_skipped: bool,

    /// Probe one link at a time instead of in concurrent waves
    pub single_threaded: bool,

    /// Upper bound on entries drained per wave (0 = unbounded)
    pub max_wave_width: usize,

    /// Tag/attribute rules used for link extraction (empty = all)
    pub match_rules: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_MS,
            accepted_codes: vec![999],
            ignored_prefixes: ["javascript", "data", "mailto", "sms", "tel", "geo"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            skip: Vec::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            get: false,
            ignore_skipped: false,
            single_threaded: false,
            max_wave_width: 0,
            match_rules: Vec::new(),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Reporters to run once the crawl is over
    pub reporters: Vec<ReporterKind>,

    /// Where the JUnit reporter writes its document
    pub junit_path: String,

    /// Print one progress character per checked link
    pub progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            reporters: vec![ReporterKind::Console],
            junit_path: "junit-report.xml".to_string(),
            progress: true,
        }
    }
}
