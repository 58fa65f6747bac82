//! Test result domain model.
//!
//! One `TestResult` is one evaluation outcome. Results are append-only:
//! created once by a suite adapter during a run, immutable thereafter,
//! purged by the retention sweep after the configured window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::suite::{Suite, TestSeverity, TestStatus};

/// Suite-specific structured detail payload.
///
/// A tagged sum type rather than a schemaless blob so the aggregator
/// and alert engine can pattern-match instead of probing keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SuiteDetail {
    /// Accuracy-style check over a sample of records.
    Accuracy {
        sample_size: usize,
        accurate: usize,
        accuracy: f64,
    },
    /// Calibration of stated confidence vs. judged correctness.
    Calibration {
        sample_size: usize,
        mean_confidence: f64,
        judged_rate: f64,
        calibration_error: f64,
    },
    /// Latency percentile measurement.
    Latency {
        sample_size: usize,
        p95_ms: f64,
        threshold_ms: f64,
    },
    /// One protected-attribute group's fairness evaluation.
    Fairness {
        attribute: String,
        group: String,
        group_size: usize,
        group_rate: f64,
        overall_rate: f64,
        demographic_parity: f64,
        equal_opportunity: Option<f64>,
        violation: bool,
    },
    /// Security scan outcome.
    Security {
        sample_size: usize,
        pii_hits: usize,
        offending_ids: Vec<String>,
    },
    /// Referential-consistency count.
    Consistency {
        checked: usize,
        dangling: usize,
    },
    /// A metric compared against its baseline.
    BaselineComparison {
        metric_name: String,
        current: f64,
        baseline: f64,
        tolerance_pct: f64,
        verdict: String,
        /// How far past the tolerance band, as a multiple of the
        /// tolerance; 0 unless degraded
        #[serde(default)]
        degradation_multiple: f64,
    },
    /// Free-form note for skips and error conversions.
    Note { reason: String },
}

/// One evaluation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub result_id: Uuid,
    /// Groups results from one orchestrated execution
    pub run_id: Uuid,
    pub suite: Suite,
    pub test_name: String,
    pub status: TestStatus,
    /// Suite-declared severity of this check, feeds the alert rule table
    pub severity: TestSeverity,
    /// Suite-defined semantics (accuracy in 0..1, parity delta, ms, ...).
    /// Absent for `Error` and `Skipped`.
    pub score: Option<f64>,
    pub duration_ms: u64,
    pub detail: Option<SuiteDetail>,
    /// Present iff status is `Failed` or `Error`
    pub error_message: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl TestResult {
    /// A passing/failing/warning result with a score.
    pub fn evaluated(
        run_id: Uuid,
        suite: Suite,
        test_name: impl Into<String>,
        status: TestStatus,
        score: f64,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            result_id: Uuid::new_v4(),
            run_id,
            suite,
            test_name: test_name.into(),
            status,
            severity: TestSeverity::Medium,
            score: Some(score),
            duration_ms: 0,
            detail: None,
            error_message: None,
            recorded_at,
        }
    }

    /// A skipped check with a reason (insufficient data, missing policy,
    /// judge unavailable). Skips never read as passes.
    pub fn skipped(
        run_id: Uuid,
        suite: Suite,
        test_name: impl Into<String>,
        reason: impl Into<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            result_id: Uuid::new_v4(),
            run_id,
            suite,
            test_name: test_name.into(),
            status: TestStatus::Skipped,
            severity: TestSeverity::Low,
            score: None,
            duration_ms: 0,
            detail: Some(SuiteDetail::Note {
                reason: reason.into(),
            }),
            error_message: None,
            recorded_at,
        }
    }

    /// The single `Error` result the orchestrator records when a suite
    /// adapter faults past its boundary.
    pub fn suite_error(
        run_id: Uuid,
        suite: Suite,
        message: impl Into<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        let message = message.into();
        Self {
            result_id: Uuid::new_v4(),
            run_id,
            suite,
            test_name: format!("{suite}_suite_execution"),
            status: TestStatus::Error,
            severity: TestSeverity::High,
            score: None,
            duration_ms: 0,
            detail: Some(SuiteDetail::Note {
                reason: message.clone(),
            }),
            error_message: Some(message),
            recorded_at,
        }
    }

    pub fn with_severity(mut self, severity: TestSeverity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_detail(mut self, detail: SuiteDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Invariant check: error_message present iff Failed/Error, score
    /// absent for Error/Skipped.
    pub fn is_well_formed(&self) -> bool {
        let message_ok = match self.status {
            TestStatus::Error => self
                .error_message
                .as_ref()
                .is_some_and(|m| !m.is_empty()),
            TestStatus::Passed | TestStatus::Warning => self.error_message.is_none(),
            TestStatus::Failed | TestStatus::Skipped => true,
        };
        let score_ok = match self.status {
            TestStatus::Error | TestStatus::Skipped => self.score.is_none(),
            _ => self.score.is_some(),
        };
        message_ok && score_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suite_error_is_well_formed() {
        let r = TestResult::suite_error(
            Uuid::new_v4(),
            Suite::Semantic,
            "data source unreachable",
            Utc::now(),
        );
        assert_eq!(r.status, TestStatus::Error);
        assert!(r.is_well_formed());
    }

    #[test]
    fn skipped_has_no_score() {
        let r = TestResult::skipped(
            Uuid::new_v4(),
            Suite::Fairness,
            "fairness_gender",
            "group below minimum sample size",
            Utc::now(),
        );
        assert!(r.score.is_none());
        assert!(r.is_well_formed());
    }

    #[test]
    fn passed_with_message_is_malformed() {
        let r = TestResult::evaluated(
            Uuid::new_v4(),
            Suite::Semantic,
            "t",
            TestStatus::Passed,
            0.9,
            Utc::now(),
        )
        .with_error_message("should not be here");
        assert!(!r.is_well_formed());
    }

    #[test]
    fn detail_serde_roundtrip() {
        let detail = SuiteDetail::Fairness {
            attribute: "gender".into(),
            group: "f".into(),
            group_size: 40,
            group_rate: 0.55,
            overall_rate: 0.40,
            demographic_parity: 0.15,
            equal_opportunity: None,
            violation: true,
        };
        let json = serde_json::to_string(&detail).unwrap();
        let back: SuiteDetail = serde_json::from_str(&json).unwrap();
        assert_eq!(back, detail);
    }
}
