use serde::Deserialize;
use std::time::Duration;

/// Crawler configuration, as read from a JSON or TOML file
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerConfig {
    /// URLs to start crawling from, in order
    #[serde(default)]
    pub start_pages: Vec<String>,

    /// Patterns for URLs that must never be visited
    #[serde(default)]
    pub ignored_urls: Vec<String>,

    /// Patterns for words left out of the tally
    #[serde(default)]
    pub ignored_words: Vec<String>,

    /// Requested number of crawl workers (clamped to the hardware)
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Maximum link depth to follow from each start page
    #[serde(default)]
    pub max_depth: u32,

    /// Crawl deadline, in seconds from the start of the crawl
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Number of most popular words to report
    #[serde(default)]
    pub popular_word_count: usize,

    /// File the profile report is appended to (stdout when empty)
    #[serde(default)]
    pub profile_output_path: String,

    /// File the crawl result is written to (stdout when empty)
    #[serde(default)]
    pub result_path: String,

    /// What to do when a single page fails to fetch
    #[serde(default)]
    pub fetch_failure_policy: FetchFailurePolicy,
}

impl CrawlerConfig {
    /// Returns the crawl timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_pages: Vec::new(),
            ignored_urls: Vec::new(),
            ignored_words: Vec::new(),
            parallelism: default_parallelism(),
            max_depth: 0,
            timeout_seconds: default_timeout_seconds(),
            popular_word_count: 0,
            profile_output_path: String::new(),
            result_path: String::new(),
            fetch_failure_policy: FetchFailurePolicy::default(),
        }
    }
}

/// Policy for pages whose fetch fails
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FetchFailurePolicy {
    /// The first failed fetch aborts the whole crawl
    #[default]
    Abort,
    /// A failed page counts as visited but contributes no words or links
    Skip,
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_timeout_seconds() -> u64 {
    1
}
