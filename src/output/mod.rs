//! Output module for crawl results and profile reports
//!
//! This module handles:
//! - Writing the crawl result as pretty JSON
//! - Writing the profiler report
//!
//! An empty path means standard output for both.

use crate::crawler::CrawlResult;
use crate::profiler::Profiler;
use crate::{OutputError, ProfilerError};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes `result` as JSON to `writer`, followed by a newline
pub fn write_result_json<W: Write>(result: &CrawlResult, writer: &mut W) -> Result<(), OutputError> {
    serde_json::to_writer_pretty(&mut *writer, result)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes the crawl result to `path`, replacing any existing file
///
/// # Arguments
///
/// * `result` - The finished crawl result
/// * `path` - Destination file; empty for standard output
///
/// # Returns
///
/// * `Ok(())` - Result written
/// * `Err(OutputError)` - Failed to create the file or serialize the result
pub fn write_crawl_result(result: &CrawlResult, path: &str) -> Result<(), OutputError> {
    if path.is_empty() {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        return write_result_json(result, &mut handle);
    }

    let mut writer = BufWriter::new(File::create(path)?);
    write_result_json(result, &mut writer)
}

/// Writes the profiler report to `path` (appending), or to stdout if empty
pub fn write_profile(profiler: &Profiler, path: &str) -> Result<(), ProfilerError> {
    if !path.is_empty() {
        return profiler.write_data(Path::new(path));
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    profiler
        .write_report(&mut handle)
        .and_then(|_| handle.flush())
        .map_err(|source| ProfilerError::Io {
            path: "<stdout>".to_string(),
            source,
        })
}
