//! Wall-clock abstraction for event timestamps.
//!
//! Frame timing never reads this clock: the director advances on explicit
//! tick deltas. The clock only stamps observability events.

use chrono::{DateTime, Utc};

/// Source of wall-clock time for event metadata.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
