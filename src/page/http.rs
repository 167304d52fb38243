//! HTTP page source
//!
//! This module fetches pages for the crawler:
//! - `http`/`https` URLs through a blocking reqwest client
//! - `file` URLs straight from disk, which keeps local crawls and tests offline
//!
//! Each fetched body is handed to the HTML parser for words and links.

use crate::page::parser::parse_html;
use crate::page::{PageData, PageSource};
use crate::url::PatternSet;
use crate::FetchError;
use reqwest::blocking::Client;
use std::time::Duration;
use url::Url;

/// Longest a single request may wait, whatever the crawl timeout
const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Page source that downloads and parses HTML pages
///
/// The underlying blocking client must not be created or dropped inside an
/// async context; build it on a plain thread (or inside `spawn_blocking`).
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    ignored_words: PatternSet,
}

impl HttpPageSource {
    /// Builds a page source with the given request timeout
    ///
    /// # Arguments
    ///
    /// * `timeout` - Per-request timeout, capped at one hour
    /// * `ignored_words` - Words left out of every page's tally
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use word_tally::page::{HttpPageSource, PageSource};
    /// use word_tally::url::PatternSet;
    ///
    /// let source = HttpPageSource::new(Duration::from_secs(5), PatternSet::default()).unwrap();
    /// let page = source.fetch("https://example.com/").unwrap();
    /// println!("{} links", page.links.len());
    /// ```
    pub fn new(timeout: Duration, ignored_words: PatternSet) -> Result<Self, reqwest::Error> {
        let timeout = timeout.min(MAX_REQUEST_TIMEOUT);
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            ignored_words,
        })
    }

    fn fetch_http(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })
    }

    fn fetch_file(&self, url: &Url) -> Result<String, FetchError> {
        let path = url.to_file_path().map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
            message: "not a local file path".to_string(),
        })?;

        std::fs::read_to_string(&path).map_err(|source| FetchError::Io {
            url: url.to_string(),
            source,
        })
    }
}

impl PageSource for HttpPageSource {
    fn fetch(&self, url: &str) -> Result<PageData, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let body = match parsed.scheme() {
            "http" | "https" => self.fetch_http(&parsed)?,
            "file" => self.fetch_file(&parsed)?,
            other => {
                return Err(FetchError::InvalidUrl {
                    url: url.to_string(),
                    message: format!("unsupported scheme '{}'", other),
                })
            }
        };

        Ok(parse_html(&body, &parsed, &self.ignored_words))
    }
}
