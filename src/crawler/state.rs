//! Shared crawl state: the visited set and the word tally
//!
//! Both structures are safe to mutate from many crawl tasks at once; each
//! operation is atomic on its own, so tasks never lock anything themselves.

use dashmap::{DashMap, DashSet};
use std::collections::HashMap;

/// URLs already claimed by a crawl task
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url`, returning true if no task had claimed it before
    pub fn insert(&self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Number of claimed URLs; only meaningful once every task has finished
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Running word counts across every visited page
#[derive(Debug, Default)]
pub struct TallyStore {
    counts: DashMap<String, u64>,
}

impl TallyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every count in `word_counts` to the running totals
    pub fn merge(&self, word_counts: &HashMap<String, u64>) {
        for (word, count) in word_counts {
            *self.counts.entry(word.clone()).or_insert(0) += count;
        }
    }

    pub fn get(&self, word: &str) -> Option<u64> {
        self.counts.get(word).map(|count| *count)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Copies the totals out; only meaningful once every task has finished
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}
