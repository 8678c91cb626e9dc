//! Timestamp type used throughout the oracle.
//!
//! Timestamps are Unix epoch seconds (UTC) as supplied by the execution
//! substrate's monotonic clock. Window checks compare them exactly, so every
//! boundary helper here spells out whether the edge second is included.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// `self + secs`, saturating at `u64::MAX`.
    pub fn saturating_add(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Whether `now` is still inside the window `[.., self + duration_secs]`.
    ///
    /// The closing second itself is inside the window.
    pub fn within(&self, duration_secs: u64, now: Timestamp) -> bool {
        now <= self.saturating_add(duration_secs)
    }

    /// Whether the window `[.., self + duration_secs]` has fully elapsed at `now`.
    ///
    /// Exact complement of [`Timestamp::within`].
    pub fn has_elapsed(&self, duration_secs: u64, now: Timestamp) -> bool {
        !self.within(duration_secs, now)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_edges_are_inclusive_on_the_open_side() {
        let start = Timestamp::new(1_000);
        assert!(start.within(60, Timestamp::new(1_060)));
        assert!(!start.has_elapsed(60, Timestamp::new(1_060)));
        assert!(start.has_elapsed(60, Timestamp::new(1_061)));
    }

    #[test]
    fn saturating_window_never_elapses() {
        let start = Timestamp::new(u64::MAX - 1);
        assert!(start.within(10, Timestamp::new(u64::MAX)));
    }
}
