//! Controllable substrate clock.

use oracle_types::Timestamp;
use std::cell::Cell;

/// Stand-in for the substrate's monotonic clock.
///
/// Only moves when told to, and never backwards.
#[derive(Debug, Default)]
pub struct NullClock {
    now: Cell<u64>,
}

impl NullClock {
    pub fn starting_at(secs: u64) -> Self {
        Self {
            now: Cell::new(secs),
        }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.now.get())
    }

    /// Move forward by `secs`, saturating at the end of time.
    pub fn advance(&self, secs: u64) -> Timestamp {
        self.now.set(self.now.get().saturating_add(secs));
        self.now()
    }

    /// Jump to `secs`. Refuses to go back, returning the current time.
    pub fn advance_to(&self, secs: u64) -> Result<Timestamp, Timestamp> {
        if secs < self.now.get() {
            return Err(self.now());
        }
        self.now.set(secs);
        Ok(self.now())
    }
}
