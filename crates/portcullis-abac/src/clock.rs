//! Injected wall-clock capability.
//!
//! The evaluator never reads the system time itself. Callers pick a clock and
//! build an [`AccessContext`](crate::AccessContext) from it.

use chrono::{Local, NaiveTime};

/// Source of the current wall-clock time of day.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;
}

/// Reads the local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(NaiveTime);

impl FixedClock {
    pub fn new(now: NaiveTime) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}
