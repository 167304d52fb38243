//! URL handling module for Word-Tally
//!
//! This module provides link resolution for discovered hrefs and the
//! whole-string pattern sets used to exclude URLs and ignore words.

mod matcher;
mod resolve;

// Re-export main functions
pub use matcher::PatternSet;
pub use resolve::resolve_link;
