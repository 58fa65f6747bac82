//! Run summary domain model.
//!
//! One `RunSummary` per orchestrated execution, created exactly once at
//! the end of the run and never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::suite::{Environment, TestStatus};
use super::test_result::TestResult;

/// Terminal state of an orchestrated run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// All requested suites were dispatched (some may have errored)
    Completed,
    /// Cancellation was requested before all suites were dispatched
    Cancelled,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "completed" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Aggregate of one orchestrated execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub status: RunStatus,
    pub environment: Environment,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub suites_requested: usize,
    pub suites_completed: usize,
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub warned: usize,
    pub skipped: usize,
    pub errored: usize,
    /// passed / total. `None` (not NaN) when `total_tests == 0`.
    pub success_rate: Option<f64>,
    pub total_duration_ms: u64,
    /// Produced by the external judge from the numeric rollup; absent
    /// when generation failed (best-effort only).
    pub narrative_summary: Option<String>,
}

impl RunSummary {
    /// Compute the rollup counts from the run's results.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_results(
        run_id: Uuid,
        status: RunStatus,
        environment: Environment,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        suites_requested: usize,
        suites_completed: usize,
        results: &[TestResult],
    ) -> Self {
        let mut passed = 0;
        let mut failed = 0;
        let mut warned = 0;
        let mut skipped = 0;
        let mut errored = 0;
        let mut total_duration_ms = 0u64;

        for result in results {
            match result.status {
                TestStatus::Passed => passed += 1,
                TestStatus::Failed => failed += 1,
                TestStatus::Warning => warned += 1,
                TestStatus::Skipped => skipped += 1,
                TestStatus::Error => errored += 1,
            }
            total_duration_ms += result.duration_ms;
        }

        let total_tests = results.len();
        let success_rate = if total_tests == 0 {
            None
        } else {
            Some(passed as f64 / total_tests as f64)
        };

        Self {
            run_id,
            status,
            environment,
            started_at,
            ended_at,
            suites_requested,
            suites_completed,
            total_tests,
            passed,
            failed,
            warned,
            skipped,
            errored,
            success_rate,
            total_duration_ms,
            narrative_summary: None,
        }
    }

    /// Count identity every summary must satisfy.
    pub fn counts_consistent(&self) -> bool {
        self.passed + self.failed + self.warned + self.skipped + self.errored == self.total_tests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::suite::Suite;

    fn result(status: TestStatus) -> TestResult {
        let mut r = TestResult::evaluated(
            Uuid::new_v4(),
            Suite::Semantic,
            "t",
            status,
            0.5,
            Utc::now(),
        );
        if status == TestStatus::Error || status == TestStatus::Skipped {
            r.score = None;
        }
        r
    }

    #[test]
    fn empty_run_has_null_success_rate() {
        let now = Utc::now();
        let summary = RunSummary::from_results(
            Uuid::new_v4(),
            RunStatus::Completed,
            Environment::Development,
            now,
            now,
            0,
            0,
            &[],
        );
        assert_eq!(summary.total_tests, 0);
        assert!(summary.success_rate.is_none());
        assert!(summary.counts_consistent());
    }

    #[test]
    fn counts_sum_to_total() {
        let results = vec![
            result(TestStatus::Passed),
            result(TestStatus::Passed),
            result(TestStatus::Failed),
            result(TestStatus::Warning),
            result(TestStatus::Skipped),
            result(TestStatus::Error),
        ];
        let now = Utc::now();
        let summary = RunSummary::from_results(
            Uuid::new_v4(),
            RunStatus::Completed,
            Environment::Development,
            now,
            now,
            2,
            2,
            &results,
        );
        assert_eq!(summary.total_tests, 6);
        assert!(summary.counts_consistent());
        let rate = summary.success_rate.unwrap();
        assert!((rate - 2.0 / 6.0).abs() < 1e-9);
    }
}
