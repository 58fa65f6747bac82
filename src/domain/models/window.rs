//! Explicit evaluation time windows.
//!
//! Every adapter and the health engine receive a window value; nothing
//! inside business logic reads the wall clock. The orchestration
//! boundary (CLI, scheduler) is the only place "now" is sampled.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Half-open interval `[start, end)` over which records are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window covering the `hours` before `end`.
    pub fn ending_at(end: DateTime<Utc>, hours: i64) -> Self {
        Self {
            start: end - Duration::hours(hours),
            end,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The equal-length window immediately before this one.
    ///
    /// Used by the health engine for trend comparison.
    pub fn preceding(&self) -> Self {
        let len = self.duration();
        Self {
            start: self.start - len,
            end: self.start,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preceding_window_abuts_current() {
        let end = Utc::now();
        let window = TimeWindow::ending_at(end, 24);
        let prior = window.preceding();
        assert_eq!(prior.end, window.start);
        assert_eq!(prior.duration(), window.duration());
    }

    #[test]
    fn contains_is_half_open() {
        let end = Utc::now();
        let window = TimeWindow::ending_at(end, 1);
        assert!(window.contains(window.start));
        assert!(!window.contains(window.end));
    }
}
