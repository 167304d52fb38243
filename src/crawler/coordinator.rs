//! Crawl coordinator - owns the worker pool and assembles crawl results
//!
//! This module contains the entry point of a crawl. For every call it:
//! - Computes the deadline once from the configured timeout
//! - Creates a fresh visited set and tally
//! - Spawns one root task per start page and waits for every subtree
//! - Builds the result from the settled state

use crate::clock::Clock;
use crate::config::{CrawlerConfig, FetchFailurePolicy};
use crate::crawler::state::{TallyStore, VisitedSet};
use crate::crawler::task::{crawl_page, CrawlContext};
use crate::crawler::word_counts::top_words;
use crate::crawler::{CrawlResult, WebCrawler};
use crate::page::PageSource;
use crate::url::PatternSet;
use crate::CrawlError;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::task::JoinSet;

/// Crawler that fetches pages in parallel on a work-stealing worker pool
///
/// The pool is a dedicated multi-thread tokio runtime sized to
/// `min(parallelism, available hardware parallelism)`. Fetches run on its
/// blocking pool, capped at the same size. Because the crawler owns a
/// runtime, it must be created, used and dropped outside of any async
/// context.
pub struct ParallelCrawler {
    runtime: Runtime,
    source: Arc<dyn PageSource>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
    max_depth: u32,
    popular_word_count: usize,
    ignored_urls: PatternSet,
    failure_policy: FetchFailurePolicy,
    parallelism: usize,
}

impl ParallelCrawler {
    /// Creates a crawler and starts its worker pool
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `source` - Where pages are fetched from
    /// * `clock` - Clock used for the crawl deadline
    ///
    /// # Returns
    ///
    /// * `Ok(ParallelCrawler)` - Ready to crawl
    /// * `Err(WordTallyError)` - An ignored-URL pattern is invalid or the
    ///   worker pool could not be started
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use std::sync::Arc;
    /// use word_tally::config::load_config;
    /// use word_tally::page::HttpPageSource;
    /// use word_tally::url::PatternSet;
    /// use word_tally::{ParallelCrawler, SystemClock, WebCrawler};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = load_config(Path::new("crawl.json"))?;
    /// let source = HttpPageSource::new(config.timeout(), PatternSet::new(&config.ignored_words)?)?;
    /// let crawler = ParallelCrawler::new(&config, Arc::new(source), Arc::new(SystemClock))?;
    /// let result = crawler.crawl(&config.start_pages)?;
    /// println!("Visited {} pages", result.urls_visited);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(
        config: &CrawlerConfig,
        source: Arc<dyn PageSource>,
        clock: Arc<dyn Clock>,
    ) -> crate::Result<Self> {
        let ignored_urls = PatternSet::new(&config.ignored_urls)?;
        let parallelism = config.parallelism.clamp(1, available_parallelism());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(parallelism)
            .max_blocking_threads(parallelism)
            .thread_name("word-tally-worker")
            .enable_all()
            .build()
            .map_err(CrawlError::Runtime)?;

        tracing::debug!(
            "Started crawl worker pool with {} threads (requested {})",
            parallelism,
            config.parallelism
        );

        Ok(Self {
            runtime,
            source,
            clock,
            timeout: config.timeout(),
            max_depth: config.max_depth,
            popular_word_count: config.popular_word_count,
            ignored_urls,
            failure_policy: config.fetch_failure_policy,
            parallelism,
        })
    }

    /// Number of worker threads actually in use
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }
}

impl WebCrawler for ParallelCrawler {
    fn crawl(&self, start_pages: &[String]) -> Result<CrawlResult, CrawlError> {
        let ctx = Arc::new(CrawlContext {
            source: Arc::clone(&self.source),
            clock: Arc::clone(&self.clock),
            deadline: self.clock.now().checked_add(self.timeout),
            ignored_urls: self.ignored_urls.clone(),
            failure_policy: self.failure_policy,
            visited: VisitedSet::new(),
            tally: TallyStore::new(),
        });

        tracing::info!(
            "Crawling {} start pages (max depth {}, timeout {:?})",
            start_pages.len(),
            self.max_depth,
            self.timeout
        );

        self.runtime.block_on(async {
            let mut roots = JoinSet::new();
            for page in start_pages {
                roots.spawn(crawl_page(Arc::clone(&ctx), page.clone(), self.max_depth));
            }

            while let Some(joined) = roots.join_next().await {
                joined.map_err(|e| CrawlError::Worker(e.to_string()))??;
            }

            Ok::<(), CrawlError>(())
        })?;

        // Every task has joined, so the shared state is settled
        let word_counts = if ctx.tally.is_empty() {
            Vec::new()
        } else {
            top_words(&ctx.tally.snapshot(), self.popular_word_count)
        };
        let urls_visited = ctx.visited.len();

        tracing::info!("Crawl finished: {} pages visited", urls_visited);

        Ok(CrawlResult {
            word_counts,
            urls_visited,
        })
    }

    fn max_parallelism(&self) -> usize {
        available_parallelism()
    }
}

fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
