//! Call profiling for crawler capabilities
//!
//! A [`Profiler`] hands out [`Profiled`] stand-ins that forward every call to
//! the wrapped delegate and add the duration of profiled operations to a
//! shared [`ProfilingState`]. Which operations are profiled is declared
//! statically by each capability through the [`Capability`] trait.
//!
//! One profiler is created per run. Every stand-in it creates records into
//! the same state, and the state lives as long as the profiler.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use word_tally::page::{PageData, PageSource};
//! use word_tally::profiler::Profiler;
//! use word_tally::{FetchError, SystemClock};
//!
//! struct Empty;
//!
//! impl PageSource for Empty {
//!     fn fetch(&self, _url: &str) -> Result<PageData, FetchError> {
//!         Ok(PageData::default())
//!     }
//! }
//!
//! let profiler = Profiler::new(Arc::new(SystemClock));
//! let source = profiler.wrap::<dyn PageSource, _>(Empty).unwrap();
//! source.fetch("https://example.com/").unwrap();
//! assert_eq!(profiler.state().snapshot().len(), 1);
//! ```

mod stand_in;
mod state;

pub use stand_in::Profiled;
pub use state::{ProfileKey, ProfilingState};

use crate::clock::Clock;
use crate::ProfilerError;
use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

/// One operation of a capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Signature used as the profiling key
    pub signature: &'static str,
    /// Whether calls to this operation are timed
    pub profiled: bool,
}

impl Operation {
    pub const fn profiled(signature: &'static str) -> Self {
        Self {
            signature,
            profiled: true,
        }
    }

    pub const fn untimed(signature: &'static str) -> Self {
        Self {
            signature,
            profiled: false,
        }
    }
}

/// A set of operations that can be wrapped by the profiler
///
/// Implemented on the capability's trait object type, e.g.
/// `impl Capability for dyn PageSource`.
pub trait Capability {
    /// Every operation the capability exposes
    fn operations() -> &'static [Operation];
}

/// Creates profiled stand-ins and reports their timings
pub struct Profiler {
    clock: Arc<dyn Clock>,
    state: Arc<ProfilingState>,
    start_time: DateTime<Utc>,
}

impl Profiler {
    /// Creates a profiler; its start time is read from `clock` now
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let start_time = clock.wall_time();
        Self {
            clock,
            state: Arc::new(ProfilingState::new()),
            start_time,
        }
    }

    /// Wraps `delegate` in a stand-in for capability `C`
    ///
    /// # Returns
    ///
    /// * `Ok(Profiled<T>)` - Stand-in recording into this profiler's state
    /// * `Err(ProfilerError::Configuration)` - `C` declares no operations
    pub fn wrap<C, T>(&self, delegate: T) -> Result<Profiled<T>, ProfilerError>
    where
        C: Capability + ?Sized,
    {
        let operations = C::operations();
        if operations.is_empty() {
            return Err(ProfilerError::Configuration(format!(
                "{} declares no operations to profile",
                std::any::type_name::<C>()
            )));
        }

        Ok(Profiled::new(
            delegate,
            operations,
            Arc::clone(&self.clock),
            Arc::clone(&self.state),
        ))
    }

    pub fn state(&self) -> &ProfilingState {
        &self.state
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Writes the report to `writer`
    pub fn write_report<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.state.write_report(self.start_time, writer)
    }

    /// Appends the report to the file at `path`, creating it if needed
    pub fn write_data(&self, path: &Path) -> Result<(), ProfilerError> {
        let to_error = |source| ProfilerError::Io {
            path: path.display().to_string(),
            source,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(to_error)?;
        let mut writer = BufWriter::new(file);
        self.write_report(&mut writer).map_err(to_error)?;
        writer.flush().map_err(to_error)
    }
}
