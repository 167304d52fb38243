//! The recursive crawl task
//!
//! One task handles one URL at one remaining depth. It claims the URL, fetches
//! it on a blocking worker, merges its words into the shared tally, then
//! spawns a child task per link and waits for all of them.

use crate::clock::Clock;
use crate::config::FetchFailurePolicy;
use crate::crawler::state::{TallyStore, VisitedSet};
use crate::page::{PageData, PageSource};
use crate::url::PatternSet;
use crate::CrawlError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Future returned by [`crawl_page`]; boxed because the task recurses
pub(crate) type CrawlFuture = Pin<Box<dyn Future<Output = Result<bool, CrawlError>> + Send>>;

/// Everything the tasks of one crawl share
pub(crate) struct CrawlContext {
    pub source: Arc<dyn PageSource>,
    pub clock: Arc<dyn Clock>,
    /// `None` when the timeout is too large to represent as an instant
    pub deadline: Option<Instant>,
    pub ignored_urls: PatternSet,
    pub failure_policy: FetchFailurePolicy,
    pub visited: VisitedSet,
    pub tally: TallyStore,
}

impl CrawlContext {
    /// Checks the conditions under which a task does nothing at all
    fn should_skip(&self, url: &str, remaining_depth: u32) -> bool {
        remaining_depth == 0
            || self.deadline.is_some_and(|deadline| self.clock.now() > deadline)
            || self.ignored_urls.matches(url)
    }

    /// Runs the page source on the runtime's blocking pool
    async fn fetch(&self, url: &str) -> Result<Result<PageData, crate::FetchError>, CrawlError> {
        let source = Arc::clone(&self.source);
        let url = url.to_string();

        tokio::task::spawn_blocking(move || source.fetch(&url))
            .await
            .map_err(|e| CrawlError::Worker(e.to_string()))
    }
}

/// Crawls `url` and, recursively, everything it links to
///
/// Resolves to `Ok(true)` if this task claimed and processed the URL and
/// `Ok(false)` if it was skipped (depth exhausted, past the deadline,
/// excluded, or already claimed by another task).
pub(crate) fn crawl_page(ctx: Arc<CrawlContext>, url: String, remaining_depth: u32) -> CrawlFuture {
    Box::pin(async move {
        if ctx.should_skip(&url, remaining_depth) {
            tracing::trace!("Skipping {} (remaining depth {})", url, remaining_depth);
            return Ok(false);
        }

        if !ctx.visited.insert(&url) {
            return Ok(false);
        }

        let page = match ctx.fetch(&url).await? {
            Ok(page) => page,
            Err(e) => match ctx.failure_policy {
                FetchFailurePolicy::Abort => return Err(CrawlError::Fetch(e)),
                FetchFailurePolicy::Skip => {
                    tracing::warn!("Skipping {} after failed fetch: {}", url, e);
                    return Ok(true);
                }
            },
        };

        ctx.tally.merge(&page.word_counts);

        tracing::debug!(
            "Visited {} (remaining depth {}, {} distinct words, {} links)",
            url,
            remaining_depth,
            page.word_counts.len(),
            page.links.len()
        );

        let mut children = JoinSet::new();
        for link in page.links {
            children.spawn(crawl_page(Arc::clone(&ctx), link, remaining_depth - 1));
        }

        // Returning early drops the set, which aborts the remaining children
        while let Some(joined) = children.join_next().await {
            joined.map_err(|e| CrawlError::Worker(e.to_string()))??;
        }

        Ok(true)
    })
}
