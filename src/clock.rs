//! Wall-clock and id collaborators
//!
//! The domain never calls `Local::now()` directly; it asks a [`Clock`] so that
//! urgency and calendar results can be pinned in tests.

use chrono::{Local, NaiveDate, NaiveDateTime};
use std::sync::Mutex;

/// Source of the current local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Clock backed by the system's local time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Generates time-derived integer ids
///
/// Ids are milliseconds since the Unix epoch, bumped by one whenever two
/// requests land in the same millisecond, so they never repeat within a
/// process.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: Mutex<i64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id that is strictly greater than every id handed out before
    ///
    /// `None` once the floor has reached `i64::MAX`.
    pub fn next_id(&self) -> Option<i64> {
        self.next_after(Local::now().timestamp_millis())
    }

    fn next_after(&self, candidate: i64) -> Option<i64> {
        let mut last = self.last.lock().unwrap();
        let id = if candidate > *last {
            candidate
        } else {
            last.checked_add(1)?
        };
        *last = id;
        Some(id)
    }

    /// Make sure future ids start above `floor` (used after loading stored tasks)
    pub fn observe(&self, floor: i64) {
        let mut last = self.last.lock().unwrap();
        if floor > *last {
            *last = floor;
        }
    }
}
