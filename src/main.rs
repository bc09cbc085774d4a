//! Link-Inspector main entry point
//!
//! This is the command-line interface for the Link-Inspector broken-link checker.

use anyhow::{bail, Context};
use clap::Parser;
use link_inspector::config::{load_config_with_hash, validate, Config};
use link_inspector::crawler::run_inspection;
use link_inspector::output::{
    ConsoleReporter, DotProgress, JunitReporter, ProgressObserver, ReporterKind,
};
use link_inspector::ResultStore;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Link-Inspector: a concurrent broken-link checker
///
/// Link-Inspector fetches the seed pages, checks every link they contain,
/// and optionally follows links that stay on the seed's origin. The exit
/// code is 0 when every link is healthy, 1 when a broken link was found,
/// and 2 on a fatal error.
#[derive(Parser, Debug)]
#[command(name = "link-inspector")]
#[command(version)]
#[command(about = "A concurrent broken-link checker", long_about = None)]
struct Cli {
    /// Seed URLs to inspect
    #[arg(value_name = "URL")]
    seeds: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Read additional seed URLs from a file, one per line
    #[arg(long, value_name = "FILE")]
    urls_file: Option<PathBuf>,

    /// Follow links on the seed's origin (single seed only)
    #[arg(short, long)]
    recursive: bool,

    /// Per-request timeout in milliseconds
    #[arg(short, long, value_name = "MS")]
    timeout: Option<u64>,

    /// Use GET instead of HEAD for every link
    #[arg(short, long)]
    get: bool,

    /// Skip URLs matching this substring or glob (repeatable)
    #[arg(short, long, value_name = "PATTERN")]
    skip: Vec<String>,

    /// Reporters to run, comma separated (console, junit)
    #[arg(long, value_delimiter = ',', value_name = "KIND")]
    reporters: Vec<ReporterKind>,

    /// URL scheme prefixes never probed, comma separated
    #[arg(long, value_delimiter = ',', value_name = "PREFIX")]
    ignore_prefixes: Vec<String>,

    /// Non-2xx status codes treated as healthy, comma separated
    #[arg(long, value_delimiter = ',', value_name = "CODE")]
    accept_codes: Vec<u16>,

    /// Leave skipped links out of the report
    #[arg(long)]
    ignore_skipped: bool,

    /// Probe one link at a time
    #[arg(long)]
    single_threaded: bool,

    /// Retries for a timed-out link
    #[arg(long, value_name = "N")]
    max_retries: Option<u32>,

    /// Do not print progress characters
    #[arg(long)]
    no_progress: bool,

    /// Disable colored console output
    #[arg(long)]
    no_color: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be inspected without probing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so reports on stdout stay clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_inspector=warn"),
            1 => EnvFilter::new("link_inspector=info,warn"),
            2 => EnvFilter::new("link_inspector=debug,info"),
            _ => EnvFilter::new("link_inspector=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs the command; `Ok(true)` means every link was healthy
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid configuration")?;

    let mut seeds = cli.seeds.clone();
    if let Some(path) = &cli.urls_file {
        seeds.extend(read_seed_file(path)?);
    }
    if seeds.is_empty() {
        bail!("No seed URLs given (pass URLs as arguments or use --urls-file)");
    }

    if cli.dry_run {
        handle_dry_run(&config, &seeds, cli.recursive);
        return Ok(true);
    }

    let progress: Option<Arc<dyn ProgressObserver>> = if config.output.progress && !cli.quiet {
        Some(Arc::new(DotProgress::stderr()))
    } else {
        None
    };

    let store = run_inspection(&seeds, cli.recursive, &config, progress)
        .await
        .context("Inspection failed")?;

    report(&store, &config)?;

    Ok(store.success())
}

/// Command-line flags win over file values
fn apply_overrides(config: &mut Config, cli: &Cli) {
    let crawler = &mut config.crawler;

    if let Some(timeout) = cli.timeout {
        crawler.timeout = timeout;
    }
    if let Some(max_retries) = cli.max_retries {
        crawler.max_retries = max_retries;
    }
    if !cli.skip.is_empty() {
        crawler.skip.extend(cli.skip.iter().cloned());
    }
    if !cli.ignore_prefixes.is_empty() {
        crawler.ignored_prefixes = cli.ignore_prefixes.clone();
    }
    if !cli.accept_codes.is_empty() {
        crawler.accepted_codes = cli.accept_codes.clone();
    }
    crawler.get |= cli.get;
    crawler.ignore_skipped |= cli.ignore_skipped;
    crawler.single_threaded |= cli.single_threaded;

    if !cli.reporters.is_empty() {
        config.output.reporters = cli.reporters.clone();
    }
    if cli.no_progress {
        config.output.progress = false;
    }
}

/// Reads newline-delimited seed URLs, ignoring blank lines and `#` comments
fn read_seed_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL list {}", path.display()))?;
    Ok(parse_seed_list(&content))
}

fn parse_seed_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Runs every configured reporter over the results
fn report(store: &ResultStore, config: &Config) -> anyhow::Result<()> {
    for kind in &config.output.reporters {
        match kind {
            ReporterKind::Console => store.report(&ConsoleReporter),
            ReporterKind::Junit => {
                let path = &config.output.junit_path;
                store
                    .report(&JunitReporter::to_file(path))
                    .with_context(|| format!("Failed to write JUnit report to {}", path))?;
                tracing::info!("JUnit report written to {}", path);
            }
        }
    }
    Ok(())
}

/// Handles the --dry-run mode: shows what would be inspected
fn handle_dry_run(config: &Config, seeds: &[String], recursive: bool) {
    let crawler = &config.crawler;

    println!("=== Link-Inspector Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Timeout: {}ms", crawler.timeout);
    println!("  Max retries: {}", crawler.max_retries);
    println!("  Accepted codes: {:?}", crawler.accepted_codes);
    println!("  Ignored prefixes: {}", crawler.ignored_prefixes.join(", "));
    println!("  Skip patterns: {}", crawler.skip.join(", "));
    println!("  Always GET: {}", crawler.get);
    println!("  Single-threaded: {}", crawler.single_threaded);
    if crawler.max_wave_width > 0 {
        println!("  Max wave width: {}", crawler.max_wave_width);
    }
    if !crawler.match_rules.is_empty() {
        println!("  Match rules: {}", crawler.match_rules.join(", "));
    }

    println!("\nOutput:");
    let reporters: Vec<String> = config.output.reporters.iter().map(|r| r.to_string()).collect();
    println!("  Reporters: {}", reporters.join(", "));
    println!("  JUnit path: {}", config.output.junit_path);
    println!("  Ignore skipped: {}", crawler.ignore_skipped);

    println!("\nSeeds ({}):", seeds.len());
    for seed in seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
    if recursive && seeds.len() != 1 {
        println!("! Recursion needs exactly one seed and will be disabled");
    }
}
