//! Health aggregation over a time window.
//!
//! Reads stored results only; never triggers suites. Violation rate
//! counts failed checks plus critical-severity warnings over the
//! evaluated population (skips and errors are excluded from the
//! denominator so a data drought cannot masquerade as health).

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::models::{
    HealthGrade, HealthReport, Suite, SuiteTrend, TestResult, TestSeverity, TestStatus,
    TimeWindow, TrendDirection,
};
use crate::domain::ports::ResultRepository;

/// Score movement below this is reported as stable.
const TREND_EPSILON: f64 = 0.02;

pub struct HealthEngine {
    results: Arc<dyn ResultRepository>,
}

/// Violation rate over a result set: failed + critical warnings,
/// divided by the evaluated (non-skip, non-error) population.
#[allow(clippy::cast_precision_loss)]
pub fn violation_rate(results: &[TestResult]) -> f64 {
    let evaluated = results
        .iter()
        .filter(|r| {
            matches!(
                r.status,
                TestStatus::Passed | TestStatus::Failed | TestStatus::Warning
            )
        })
        .count();
    if evaluated == 0 {
        return 0.0;
    }
    let violations = results
        .iter()
        .filter(|r| {
            r.status == TestStatus::Failed
                || (r.status == TestStatus::Warning && r.severity == TestSeverity::Critical)
        })
        .count();
    violations as f64 / evaluated as f64
}

#[allow(clippy::cast_precision_loss)]
fn avg_score(results: &[&TestResult]) -> Option<f64> {
    let scores: Vec<f64> = results.iter().filter_map(|r| r.score).collect();
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<f64>() / scores.len() as f64)
}

impl HealthEngine {
    pub fn new(results: Arc<dyn ResultRepository>) -> Self {
        Self { results }
    }

    /// Aggregate health over `window`, with per-suite trends against
    /// the immediately preceding equal-length window.
    #[allow(clippy::cast_precision_loss)]
    pub async fn health_of(&self, window: TimeWindow) -> Result<HealthReport> {
        let current = self
            .results
            .list_in_window(window)
            .await
            .context("loading results for health window")?;
        let prior = self
            .results
            .list_in_window(window.preceding())
            .await
            .context("loading results for trend window")?;

        let mut passed = 0;
        let mut failed = 0;
        let mut warned = 0;
        let mut skipped = 0;
        let mut errored = 0;
        for result in &current {
            match result.status {
                TestStatus::Passed => passed += 1,
                TestStatus::Failed => failed += 1,
                TestStatus::Warning => warned += 1,
                TestStatus::Skipped => skipped += 1,
                TestStatus::Error => errored += 1,
            }
        }

        let total_tests = current.len();
        let success_rate = if total_tests == 0 {
            None
        } else {
            Some(passed as f64 / total_tests as f64)
        };
        let rate = violation_rate(&current);
        let grade = HealthGrade::from_violation_rate(rate);

        let mut suite_trends = BTreeMap::new();
        for suite in Suite::ALL {
            let current_suite: Vec<&TestResult> =
                current.iter().filter(|r| r.suite == suite).collect();
            let Some(current_avg) = avg_score(&current_suite) else {
                continue;
            };
            let prior_suite: Vec<&TestResult> =
                prior.iter().filter(|r| r.suite == suite).collect();
            let prior_avg = avg_score(&prior_suite);

            let direction = match prior_avg {
                Some(prior_avg) if current_avg - prior_avg > TREND_EPSILON => {
                    TrendDirection::Improving
                }
                Some(prior_avg) if prior_avg - current_avg > TREND_EPSILON => {
                    TrendDirection::Declining
                }
                _ => TrendDirection::Stable,
            };

            suite_trends.insert(
                suite.as_str().to_string(),
                SuiteTrend {
                    suite,
                    current_avg_score: current_avg,
                    prior_avg_score: prior_avg,
                    direction,
                },
            );
        }

        debug!(
            total = total_tests,
            violation_rate = rate,
            grade = grade.as_str(),
            "health computed"
        );

        Ok(HealthReport {
            window,
            total_tests,
            passed,
            failed,
            warned,
            skipped,
            errored,
            success_rate,
            violation_rate: rate,
            grade,
            suite_trends,
        })
    }
}
