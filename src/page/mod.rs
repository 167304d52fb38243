//! Page sources: where the crawler gets words and links from
//!
//! The crawler only sees the [`PageSource`] trait. [`HttpPageSource`] is the
//! production implementation; tests plug in in-memory graphs.

mod http;
mod parser;

pub use http::HttpPageSource;
pub use parser::{parse_html, tally_words};

use crate::profiler::{Capability, Operation, Profiled};
use crate::FetchError;
use std::collections::HashMap;
use std::sync::Arc;

/// Words and outgoing links of a single page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageData {
    /// Occurrences of each word on the page
    pub word_counts: HashMap<String, u64>,

    /// Absolute URLs linked from the page, in document order
    pub links: Vec<String>,
}

/// Fetches a page and extracts its word tally and links
///
/// Implementations are synchronous and may block; the crawler runs them on
/// its blocking worker threads.
pub trait PageSource: Send + Sync {
    /// Fetches and parses the page at `url`
    fn fetch(&self, url: &str) -> Result<PageData, FetchError>;
}

impl Capability for dyn PageSource {
    fn operations() -> &'static [Operation] {
        const OPERATIONS: &[Operation] = &[Operation::profiled("fetch(&str)")];
        OPERATIONS
    }
}

impl<T: PageSource + ?Sized> PageSource for Arc<T> {
    fn fetch(&self, url: &str) -> Result<PageData, FetchError> {
        (**self).fetch(url)
    }
}

impl<T: PageSource + ?Sized> PageSource for Box<T> {
    fn fetch(&self, url: &str) -> Result<PageData, FetchError> {
        (**self).fetch(url)
    }
}

impl<T: PageSource> PageSource for Profiled<T> {
    fn fetch(&self, url: &str) -> Result<PageData, FetchError> {
        self.invoke("fetch(&str)", |source| source.fetch(url))
    }
}
