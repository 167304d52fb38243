//! Clock abstraction shared by the crawler and the profiler
//!
//! The crawler uses the clock for deadline checks and the profiler uses it to
//! time calls, so tests can drive both with a [`FakeClock`].

use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Returns the current monotonic instant
    fn now(&self) -> Instant;

    /// Returns the current wall-clock time
    fn wall_time(&self) -> DateTime<Utc>;
}

/// Clock backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for deterministic tests
///
/// Both [`Clock::now`] and [`Clock::wall_time`] move forward only when
/// [`FakeClock::advance`] is called.
#[derive(Debug)]
pub struct FakeClock {
    base_instant: Instant,
    base_wall: DateTime<Utc>,
    offset: Mutex<Duration>,
}

impl FakeClock {
    /// Creates a fake clock frozen at the given wall-clock time
    pub fn new(wall_time: DateTime<Utc>) -> Self {
        Self {
            base_instant: Instant::now(),
            base_wall: wall_time,
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Moves the clock forward by `duration`
    pub fn advance(&self, duration: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += duration;
    }

    fn offset(&self) -> Duration {
        *self.offset.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.base_instant + self.offset()
    }

    fn wall_time(&self) -> DateTime<Utc> {
        // Offsets in tests stay far below chrono's range limits
        self.base_wall
            + chrono::Duration::from_std(self.offset()).unwrap_or_else(|_| chrono::Duration::zero())
    }
}
