//! Configuration module for Word-Tally
//!
//! This module handles loading, parsing, and validating crawl configuration
//! files. JSON is the primary format; files ending in `.toml` are read as TOML.
//!
//! # Example
//!
//! ```no_run
//! use word_tally::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.json")).unwrap();
//! println!("Crawler will use max depth: {}", config.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CrawlerConfig, FetchFailurePolicy};

// Re-export parser functions
pub use parser::{load_config, parse_json, parse_toml};
