use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

/// Identifies one profiled operation of one concrete type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfileKey {
    /// Concrete type of the wrapped delegate
    pub type_name: &'static str,
    /// Operation signature as declared by the capability
    pub signature: &'static str,
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.type_name, self.signature)
    }
}

/// Cumulative call durations, shared by every stand-in of one profiler
///
/// Entries only ever grow; nothing is reset or removed.
#[derive(Debug, Default)]
pub struct ProfilingState {
    data: DashMap<ProfileKey, Duration>,
}

impl ProfilingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `elapsed` to the total of the given operation
    pub fn record(&self, type_name: &'static str, signature: &'static str, elapsed: Duration) {
        let key = ProfileKey {
            type_name,
            signature,
        };
        *self.data.entry(key).or_insert(Duration::ZERO) += elapsed;
    }

    /// Returns the total recorded for an operation, if it was ever recorded
    pub fn total(&self, type_name: &'static str, signature: &'static str) -> Option<Duration> {
        let key = ProfileKey {
            type_name,
            signature,
        };
        self.data.get(&key).map(|entry| *entry.value())
    }

    /// Returns every recorded total, sorted by key
    pub fn snapshot(&self) -> Vec<(ProfileKey, Duration)> {
        let mut entries: Vec<_> = self
            .data
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Writes a report headed by the run's start time
    ///
    /// ```text
    /// Run at Wed, 15 May 2024 12:00:00 +0000
    /// word_tally::page::http::HttpPageSource#fetch(&str) took 0m 3s 250ms
    /// ```
    pub fn write_report<W: Write>(&self, start_time: DateTime<Utc>, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "Run at {}", start_time.to_rfc2822())?;
        for (key, elapsed) in self.snapshot() {
            writeln!(writer, "{} took {}", key, format_duration(elapsed))?;
        }
        writeln!(writer)
    }
}

/// Formats a duration as minutes, seconds and milliseconds
fn format_duration(elapsed: Duration) -> String {
    let total_ms = elapsed.as_millis();
    format!(
        "{}m {}s {}ms",
        total_ms / 60_000,
        (total_ms / 1_000) % 60,
        total_ms % 1_000
    )
}
