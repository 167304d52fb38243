//! Crawler module for bounded parallel word counting
//!
//! This module contains the core crawling logic, including:
//! - The concurrent visited set and word tally
//! - The recursive crawl task
//! - The coordinator that runs tasks on a worker pool
//! - Popular-word selection for the final result

mod coordinator;
pub mod state;
mod task;
mod word_counts;

pub use coordinator::ParallelCrawler;
pub use word_counts::top_words;

use crate::profiler::{Capability, Operation, Profiled};
use crate::CrawlError;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// Outcome of one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    /// Most popular words with their counts, most popular first
    pub word_counts: Vec<(String, u64)>,

    /// Number of distinct pages visited
    pub urls_visited: usize,
}

impl Serialize for CrawlResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut result = serializer.serialize_struct("CrawlResult", 2)?;
        result.serialize_field("wordCounts", &RankedCounts(&self.word_counts))?;
        result.serialize_field("urlsVisited", &self.urls_visited)?;
        result.end()
    }
}

/// Serializes ranked pairs as a map, keeping their order
struct RankedCounts<'a>(&'a [(String, u64)]);

impl Serialize for RankedCounts<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (word, count) in self.0 {
            map.serialize_entry(word, count)?;
        }
        map.end()
    }
}

/// A crawler that turns start pages into a word tally
pub trait WebCrawler: Send + Sync {
    /// Crawls from `start_pages` and returns the most popular words
    fn crawl(&self, start_pages: &[String]) -> Result<CrawlResult, CrawlError>;

    /// Hardware parallelism available to the crawler
    fn max_parallelism(&self) -> usize;
}

impl Capability for dyn WebCrawler {
    fn operations() -> &'static [Operation] {
        const OPERATIONS: &[Operation] = &[
            Operation::profiled("crawl(&[String])"),
            Operation::untimed("max_parallelism()"),
        ];
        OPERATIONS
    }
}

impl<T: WebCrawler> WebCrawler for Profiled<T> {
    fn crawl(&self, start_pages: &[String]) -> Result<CrawlResult, CrawlError> {
        self.invoke("crawl(&[String])", |crawler| crawler.crawl(start_pages))
    }

    fn max_parallelism(&self) -> usize {
        self.invoke("max_parallelism()", |crawler| crawler.max_parallelism())
    }
}
