//! Inspector - main link-checking orchestration
//!
//! This module contains the wave loop that drives the frontier to
//! exhaustion, including:
//! - Seeding the frontier and choosing the recursion anchor
//! - Skipping excluded and already checked links before any request
//! - HEAD to GET escalation and bounded timeout retries
//! - Feeding links found on expandable pages back into the frontier
//! - Recording every terminal outcome in the result store

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{HttpProbe, Method, Probe, ProbeFailure};
use crate::crawler::parser::{extract_links, ExtractError, MatchRuleSet};
use crate::crawler::scheduler::{Frontier, FrontierEntry};
use crate::output::ProgressObserver;
use crate::state::{CheckOutcome, ResultItem, ResultStore, SEED_PARENT};
use crate::url::{canonicalize, CanonicalUrl, LinkFilter};
use crate::{ConfigError, InspectError};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Origin;

/// State owned by a single run
struct RunState {
    store: ResultStore,
    frontier: Frontier,
    seeds: HashSet<String>,
    anchor: Option<Origin>,
}

impl RunState {
    /// Seeds are always expanded; other pages only when they share the
    /// recursion anchor's origin
    fn is_expandable(&self, url: &CanonicalUrl) -> bool {
        self.seeds.contains(url.as_str())
            || self.anchor.as_ref().is_some_and(|origin| url.origin() == *origin)
    }
}

/// Main link-checking engine
///
/// The inspector is generic over its [`Probe`] so the network can be
/// replaced in tests.
pub struct Inspector<P: Probe> {
    config: CrawlerConfig,
    probe: P,
    filter: LinkFilter,
    rules: MatchRuleSet,
    progress: Option<Arc<dyn ProgressObserver>>,
}

impl<P: Probe> Inspector<P> {
    /// Creates a new inspector
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `probe` - Performs the network checks
    ///
    /// # Returns
    ///
    /// * `Ok(Inspector)` - Ready to run
    /// * `Err(ConfigError)` - A skip pattern failed to compile
    pub fn new(config: CrawlerConfig, probe: P) -> Result<Self, ConfigError> {
        let filter = LinkFilter::new(&config)?;
        let rules = MatchRuleSet::new(config.match_rules.clone());

        Ok(Self {
            config,
            probe,
            filter,
            rules,
            progress: None,
        })
    }

    /// Attaches an observer notified once per recorded outcome
    pub fn with_progress(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.progress = Some(observer);
        self
    }

    /// Checks every link reachable from the seeds
    ///
    /// Recursion beyond the seed pages needs exactly one seed; with several
    /// seeds it is disabled and only the seeds themselves are expanded.
    ///
    /// # Arguments
    ///
    /// * `seeds` - Absolute URLs to start from
    /// * `recursive` - Also expand pages on the seed's origin
    ///
    /// # Returns
    ///
    /// * `Ok(ResultStore)` - Every outcome of the run
    /// * `Err(InspectError::UrlError)` - A seed is not an absolute URL; nothing
    ///   was probed
    pub async fn run(&self, seeds: &[String], recursive: bool) -> Result<ResultStore, InspectError> {
        let canonical_seeds = seeds
            .iter()
            .map(|seed| canonicalize(seed, None))
            .collect::<Result<Vec<_>, _>>()?;

        let anchor = match canonical_seeds.as_slice() {
            [seed] if recursive => Some(seed.origin()),
            _ => {
                if recursive {
                    tracing::warn!(
                        "Recursion needs exactly one seed, got {}; only the seeds will be expanded",
                        seeds.len()
                    );
                }
                None
            }
        };

        let mut store = ResultStore::new(self.config.ignore_skipped);
        if let Some(progress) = &self.progress {
            store = store.with_progress(Arc::clone(progress));
        }

        let run = RunState {
            store,
            frontier: Frontier::new(),
            seeds: canonical_seeds
                .iter()
                .map(|seed| seed.as_str().to_string())
                .collect(),
            anchor,
        };

        // Reversed so the first seed is popped first
        run.frontier
            .extend(seeds.iter().rev().map(FrontierEntry::seed));

        tracing::info!(
            "Starting inspection of {} seed(s), recursive: {}",
            seeds.len(),
            run.anchor.is_some()
        );
        let start_time = Instant::now();

        if self.config.single_threaded {
            while let Some(entry) = run.frontier.pop() {
                self.process(&run, entry).await;
            }
        } else {
            let mut waves = 0;
            loop {
                let wave = run.frontier.drain_wave(self.config.max_wave_width);
                if wave.is_empty() {
                    break;
                }

                waves += 1;
                tracing::debug!("Wave {}: {} entries", waves, wave.len());
                join_all(wave.into_iter().map(|entry| self.process(&run, entry))).await;
            }
        }

        run.store.finish();

        tracing::info!(
            "Inspection completed: {} links recorded in {:?}, {}",
            run.store.count(),
            start_time.elapsed(),
            if run.store.success() {
                "no broken links"
            } else {
                "broken links found"
            }
        );

        Ok(run.store)
    }

    /// Processes a single frontier entry
    ///
    /// This method:
    /// 1. Canonicalizes the URL against its parent
    /// 2. Skips excluded or already checked URLs
    /// 3. Probes with HEAD or GET
    /// 4. Escalates, retries, or records the outcome
    /// 5. Pushes links found on expandable pages
    async fn process(&self, run: &RunState, entry: FrontierEntry) {
        let parent = entry.parent.as_deref().unwrap_or(SEED_PARENT);

        let url = match canonicalize(&entry.url, entry.parent.as_deref()) {
            Ok(url) => url,
            Err(e) => {
                record(
                    run,
                    ResultItem::with_message(entry.url.as_str(), CheckOutcome::GenericError, e.to_string()),
                    parent,
                );
                return;
            }
        };

        if !entry.requeued {
            if let Some(exclusion) = self.filter.exclusion(&url) {
                tracing::trace!("{} excluded ({:?})", url, exclusion);
                record(run, ResultItem::new(url.as_str(), CheckOutcome::Skipped), parent);
                return;
            }

            if !run.store.claim(url.as_str()) {
                record(run, ResultItem::new(url.as_str(), CheckOutcome::Skipped), parent);
                return;
            }
        }

        let expandable = run.is_expandable(&url);
        let method = if expandable { Method::Get } else { entry.method };
        let timeout = Duration::from_millis(self.config.timeout);

        tracing::trace!("Probing {} {} (attempt {})", method, url, entry.attempt);

        match self.probe.probe(method, &url, timeout).await {
            Ok(body) => {
                if expandable {
                    if let Err(e) = self.expand(run, &url, &body) {
                        tracing::warn!("Failed to extract links from {}: {}", url, e);
                        record(
                            run,
                            ResultItem::with_message(url.as_str(), CheckOutcome::GenericError, e.to_string()),
                            parent,
                        );
                        return;
                    }
                }

                let item = if entry.attempt == 0 {
                    ResultItem::new(url.as_str(), CheckOutcome::Ok)
                } else {
                    ResultItem::with_message(
                        url.as_str(),
                        CheckOutcome::Retried,
                        entry.attempt.to_string(),
                    )
                };
                record(run, item, parent);
            }
            Err(_) if method == Method::Head => {
                tracing::trace!("HEAD failed for {}, retrying with GET", url);
                run.frontier.push(entry.escalated());
            }
            Err(failure) if failure.timed_out && entry.attempt < self.config.max_retries => {
                tracing::trace!("{} timed out, retry {}", url, entry.attempt + 1);
                run.frontier.push(entry.retried());
            }
            Err(failure) => record(run, classify_failure(&url, failure), parent),
        }
    }

    /// Pushes every link found in `body` with `url` as their parent
    fn expand(
        &self,
        run: &RunState,
        url: &CanonicalUrl,
        body: &str,
    ) -> Result<(), ExtractError> {
        let links = extract_links(body, &self.rules)?;
        let method = if self.config.get {
            Method::Get
        } else {
            Method::Head
        };

        tracing::debug!("Found {} links on {}", links.len(), url);
        run.frontier.extend(
            links
                .into_iter()
                .map(|link| FrontierEntry::discovered(link, method, url.as_str())),
        );
        Ok(())
    }
}

/// Records a terminal outcome
fn record(run: &RunState, item: ResultItem, parent: &str) {
    tracing::debug!("{} {} (on {})", item.outcome, item.url, parent);
    run.store.add(item, parent);
}

/// Maps a probe failure that will not be retried to its outcome
fn classify_failure(url: &CanonicalUrl, failure: ProbeFailure) -> ResultItem {
    if failure.timed_out {
        return ResultItem::new(url.as_str(), CheckOutcome::Timeout);
    }

    match (failure.status_code, failure.reason) {
        (Some(code), _) => {
            ResultItem::with_message(url.as_str(), CheckOutcome::NonSuccessCode, code.to_string())
        }
        (None, Some(reason)) => {
            ResultItem::with_message(url.as_str(), CheckOutcome::GenericError, reason)
        }
        (None, None) => ResultItem::new(url.as_str(), CheckOutcome::GenericError),
    }
}

/// Runs a complete inspection over HTTP
///
/// # Arguments
///
/// * `seeds` - Absolute URLs to start from
/// * `recursive` - Also expand pages on the seed's origin
/// * `config` - The full configuration
///
/// # Returns
///
/// * `Ok(ResultStore)` - Every outcome of the run
/// * `Err(InspectError)` - The client could not be built or a seed is malformed
///
/// # Example
///
/// ```no_run
/// use link_inspector::config::Config;
/// use link_inspector::crawler::run_inspection;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let seeds = vec!["https://example.com/".to_string()];
/// let store = run_inspection(&seeds, true, &Config::default(), None).await?;
/// println!("healthy: {}", store.success());
/// # Ok(())
/// # }
/// ```
pub async fn run_inspection(
    seeds: &[String],
    recursive: bool,
    config: &Config,
    progress: Option<Arc<dyn ProgressObserver>>,
) -> Result<ResultStore, InspectError> {
    let probe = HttpProbe::new(config.crawler.accepted_codes.clone())?;
    let mut inspector = Inspector::new(config.crawler.clone(), probe)?;
    if let Some(progress) = progress {
        inspector = inspector.with_progress(progress);
    }
    inspector.run(seeds, recursive).await
}
