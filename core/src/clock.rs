//! Time sources for the detector.
//!
//! Detection math runs on a monotonic nanosecond counter; wall-clock time
//! is only used to make log lines readable.

use std::cell::Cell;
use std::time::Instant;

use chrono::{Local, NaiveDateTime, TimeDelta};

pub trait Clock {
    /// Monotonic nanoseconds since an arbitrary origin.
    fn monotonic_nanos(&self) -> u64;

    /// Local wall-clock time, for logs only.
    fn wall_time(&self) -> NaiveDateTime;
}

/// Real clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn monotonic_nanos(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }

    fn wall_time(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Hand-driven clock for replays and tests.
///
/// Interior mutability lets a caller advance time while the detector
/// holds the clock.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: Cell<u64>,
    wall_origin: NaiveDateTime,
}

impl ManualClock {
    pub fn new(wall_origin: NaiveDateTime) -> Self {
        Self {
            nanos: Cell::new(0),
            wall_origin,
        }
    }

    pub fn advance_millis(&self, millis: u64) {
        self.advance_nanos(millis.saturating_mul(1_000_000));
    }

    pub fn advance_nanos(&self, nanos: u64) {
        self.nanos.set(self.nanos.get().saturating_add(nanos));
    }

    /// Jump to an absolute offset. Moving backwards is ignored.
    pub fn set_millis(&self, millis: u64) {
        let target = millis.saturating_mul(1_000_000);
        if target >= self.nanos.get() {
            self.nanos.set(target);
        }
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.nanos.get() / 1_000_000
    }
}

impl Clock for ManualClock {
    fn monotonic_nanos(&self) -> u64 {
        self.nanos.get()
    }

    fn wall_time(&self) -> NaiveDateTime {
        self.wall_origin + TimeDelta::nanoseconds(self.nanos.get() as i64)
    }
}

/// Whole milliseconds between two monotonic readings, saturating at zero.
pub fn millis_between(earlier_nanos: u64, later_nanos: u64) -> u64 {
    later_nanos.saturating_sub(earlier_nanos) / 1_000_000
}
