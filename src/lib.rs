//! Word-Tally: a bounded parallel word-count crawler
//!
//! This crate crawls pages from a set of start URLs up to a maximum depth and
//! deadline, tallies word occurrences across every page it visits, and reports
//! the most popular words. A small profiler can wrap any of the crawler's
//! capabilities to measure how long their calls take.

pub mod clock;
pub mod config;
pub mod crawler;
pub mod output;
pub mod page;
pub mod profiler;
pub mod url;

use thiserror::Error;

/// Main error type for Word-Tally operations
#[derive(Debug, Error)]
pub enum WordTallyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawl error: {0}")]
    Crawl(#[from] CrawlError),

    #[error("Profiler error: {0}")]
    Profiler(#[from] ProfilerError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Errors raised by a page source while fetching a single page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read {url}: {source}")]
    Io {
        url: String,
        source: std::io::Error,
    },

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

/// Errors that abort a crawl
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Crawl worker failed: {0}")]
    Worker(String),

    #[error("Failed to start crawl workers: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Profiler errors
///
/// A delegate's own failure is never reported through this type; stand-ins
/// hand the delegate's result back to the caller unchanged.
#[derive(Debug, Error)]
pub enum ProfilerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to write profile data to {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Errors writing crawl results
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize crawl result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for Word-Tally operations
pub type Result<T> = std::result::Result<T, WordTallyError>;

// Re-export commonly used types
pub use crate::clock::{Clock, FakeClock, SystemClock};
pub use crate::config::CrawlerConfig;
pub use crate::crawler::{CrawlResult, ParallelCrawler, WebCrawler};
pub use crate::page::{HttpPageSource, PageData, PageSource};
pub use crate::profiler::{Profiled, Profiler};
pub use crate::url::PatternSet;
