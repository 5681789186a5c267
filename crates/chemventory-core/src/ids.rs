//! Clock and record id generation.
//!
//! Ids are the clock's milliseconds since the epoch. Ids minted within the
//! same millisecond (or after the clock stepped backwards) reuse the last
//! base and get a `-<n>` suffix, so one generator never repeats itself.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

/// Source of "now" for ids and record timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Mints record ids from clock readings.
#[derive(Debug, Default)]
pub struct IdGenerator {
    // (last millisecond base, sequence within it)
    last: Mutex<(i64, u32)>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self, now: DateTime<Utc>) -> String {
        let millis = now.timestamp_millis();
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if millis > last.0 {
            *last = (millis, 0);
            return millis.to_string();
        }
        last.1 += 1;
        format!("{}-{}", last.0, last.1)
    }
}
