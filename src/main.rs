//! Word-Tally main entry point
//!
//! This is the command-line interface for the Word-Tally crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use word_tally::config::{load_config, CrawlerConfig};
use word_tally::output::{write_crawl_result, write_profile};
use word_tally::page::{HttpPageSource, PageSource};
use word_tally::profiler::Profiler;
use word_tally::url::PatternSet;
use word_tally::{Clock, ParallelCrawler, SystemClock, WebCrawler};

/// Word-Tally: a bounded parallel word-count crawler
///
/// Word-Tally crawls from a set of start pages up to a maximum depth and
/// deadline, counts the words on every page it visits, and reports the most
/// popular ones along with how long the crawl took.
#[derive(Parser, Debug)]
#[command(name = "word-tally")]
#[command(version)]
#[command(about = "A bounded parallel word-count crawler", long_about = None)]
struct Cli {
    /// Path to the JSON (or .toml) configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("word_tally=info,warn"),
            1 => EnvFilter::new("word_tally=debug,info"),
            2 => EnvFilter::new("word_tally=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Results go to stdout, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &CrawlerConfig) {
    println!("=== Word-Tally Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.max_depth);
    println!("  Timeout: {}s", config.timeout_seconds);
    println!("  Parallelism: {}", config.parallelism);
    println!("  Popular word count: {}", config.popular_word_count);
    println!("  Fetch failure policy: {:?}", config.fetch_failure_policy);

    println!("\nOutput:");
    println!("  Result: {}", display_path(&config.result_path));
    println!("  Profile: {}", display_path(&config.profile_output_path));

    println!("\nStart Pages ({}):", config.start_pages.len());
    for page in &config.start_pages {
        println!("  - {}", page);
    }

    println!("\nIgnored URL Patterns ({}):", config.ignored_urls.len());
    for pattern in &config.ignored_urls {
        println!("  - {}", pattern);
    }

    println!("\nIgnored Word Patterns ({}):", config.ignored_words.len());
    for pattern in &config.ignored_words {
        println!("  - {}", pattern);
    }

    println!("\n✓ Configuration is valid");
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<stdout>"
    } else {
        path
    }
}

/// Handles the main crawl operation
fn handle_crawl(config: CrawlerConfig) -> anyhow::Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let profiler = Profiler::new(Arc::clone(&clock));

    let ignored_words = PatternSet::new(&config.ignored_words)?;
    let http_source = HttpPageSource::new(config.timeout(), ignored_words)
        .context("failed to build HTTP client")?;
    let source: Arc<dyn PageSource> = Arc::new(profiler.wrap::<dyn PageSource, _>(http_source)?);

    let crawler = profiler.wrap::<dyn WebCrawler, _>(ParallelCrawler::new(
        &config,
        source,
        Arc::clone(&clock),
    )?)?;

    tracing::info!(
        "Starting crawl of {} start pages with {} workers",
        config.start_pages.len(),
        crawler.delegate().parallelism()
    );

    let result = match crawler.crawl(&config.start_pages) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    write_crawl_result(&result, &config.result_path)
        .with_context(|| format!("failed to write crawl result to {}", display_path(&config.result_path)))?;
    write_profile(&profiler, &config.profile_output_path)?;

    tracing::info!("Crawl completed successfully");
    Ok(())
}
