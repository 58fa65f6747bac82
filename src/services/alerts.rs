//! Alert engine.
//!
//! A fixed, ordered rule table evaluated against one run's results and
//! summary. Every matching rule fires; severity comes from the table,
//! never from the adapters. Idempotence is carried by the dedupe key:
//! re-running the engine over the same run inserts nothing new.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use crate::domain::models::{
    Alert, AlertCategory, AlertSeverity, HealthGrade, RunSummary, Suite, SuiteDetail, TestResult,
    TestSeverity, TestStatus,
};
use crate::domain::ports::AlertRepository;
use crate::services::health::violation_rate;

pub struct AlertEngine {
    alerts: Arc<dyn AlertRepository>,
}

impl AlertEngine {
    pub fn new(alerts: Arc<dyn AlertRepository>) -> Self {
        Self { alerts }
    }

    /// Evaluate the rule table for one run and persist what fires.
    /// Returns only the alerts actually inserted this call.
    pub async fn evaluate_run(
        &self,
        summary: &RunSummary,
        results: &[TestResult],
    ) -> Result<Vec<Alert>> {
        let mut inserted = Vec::new();
        for alert in rule_table(summary, results) {
            let is_new = self
                .alerts
                .insert_if_absent(&alert)
                .await
                .context("persisting alert")?;
            if is_new {
                info!(
                    category = alert.category.as_str(),
                    severity = alert.severity.as_str(),
                    "alert raised: {}",
                    alert.message
                );
                inserted.push(alert);
            }
        }
        Ok(inserted)
    }
}

/// The documented rule table. Pure so the rules are testable without a
/// store.
pub fn rule_table(summary: &RunSummary, results: &[TestResult]) -> Vec<Alert> {
    let run_id = summary.run_id;
    let now = summary.ended_at;
    let mut alerts = Vec::new();

    // Rule 1: any critical-severity check failed
    let critical_failed: Vec<&TestResult> = results
        .iter()
        .filter(|r| r.status == TestStatus::Failed && r.severity == TestSeverity::Critical)
        .collect();
    if !critical_failed.is_empty() {
        let names: Vec<&str> = critical_failed.iter().map(|r| r.test_name.as_str()).collect();
        alerts.push(Alert::new(
            format!("{run_id}/failure/critical"),
            Some(run_id),
            AlertCategory::Failure,
            AlertSeverity::Critical,
            format!("{} critical check(s) failed", critical_failed.len()),
            json!({ "count": critical_failed.len(), "tests": names }),
            now,
        ));
    }

    // Rule 2: high-severity failures, escalating at three
    let high_failed = results
        .iter()
        .filter(|r| r.status == TestStatus::Failed && r.severity == TestSeverity::High)
        .count();
    if high_failed > 0 {
        let severity = if high_failed >= 3 {
            AlertSeverity::Critical
        } else {
            AlertSeverity::High
        };
        alerts.push(Alert::new(
            format!("{run_id}/failure/high"),
            Some(run_id),
            AlertCategory::Failure,
            severity,
            format!("{high_failed} high-severity check(s) failed"),
            json!({ "count": high_failed }),
            now,
        ));
    }

    // Rule 3: run-level health grade
    let rate = violation_rate(results);
    let grade = HealthGrade::from_violation_rate(rate);
    let health_severity = match grade {
        HealthGrade::Critical => Some(AlertSeverity::Critical),
        HealthGrade::NeedsImprovement => Some(AlertSeverity::Medium),
        HealthGrade::Excellent | HealthGrade::Good => None,
    };
    if let Some(severity) = health_severity {
        alerts.push(Alert::new(
            format!("{run_id}/health/grade"),
            Some(run_id),
            AlertCategory::Health,
            severity,
            format!("run health graded {} at {:.1}% violations", grade.as_str(), rate * 100.0),
            json!({ "violation_rate": rate, "grade": grade.as_str() }),
            now,
        ));
    }

    // Rule 4: baseline degradations, escalating past twice the band
    for result in results {
        let Some(SuiteDetail::BaselineComparison {
            metric_name,
            current,
            baseline,
            tolerance_pct,
            verdict,
            degradation_multiple: multiple,
        }) = &result.detail
        else {
            continue;
        };
        if verdict != "degraded" {
            continue;
        }
        // The multiple was computed direction-aware when the suite
        // classified the metric
        let severity = if *multiple > 2.0 {
            AlertSeverity::High
        } else {
            AlertSeverity::Medium
        };
        alerts.push(Alert::new(
            format!("{run_id}/performance/{metric_name}"),
            Some(run_id),
            AlertCategory::Performance,
            severity,
            format!("{metric_name} degraded to {current:.2} from baseline {baseline:.2}"),
            json!({
                "metric": metric_name,
                "current": current,
                "baseline": baseline,
                "tolerance_pct": tolerance_pct,
                "degradation_multiple": multiple,
            }),
            now,
        ));
    }

    // Rule 5: fairness violations scale with breadth
    let fairness_violations = results
        .iter()
        .filter(|r| {
            matches!(
                &r.detail,
                Some(SuiteDetail::Fairness { violation: true, .. })
            )
        })
        .count();
    if fairness_violations > 0 {
        let severity = if fairness_violations >= 10 {
            AlertSeverity::Critical
        } else if fairness_violations >= 5 {
            AlertSeverity::High
        } else if fairness_violations >= 2 {
            AlertSeverity::Medium
        } else {
            AlertSeverity::Low
        };
        alerts.push(Alert::new(
            format!("{run_id}/fairness/violations"),
            Some(run_id),
            AlertCategory::Fairness,
            severity,
            format!("{fairness_violations} fairness group(s) outside parity thresholds"),
            json!({ "violations": fairness_violations }),
            now,
        ));
    }

    // Rule 6: any security failure is critical outright
    let security_failures: Vec<&TestResult> = results
        .iter()
        .filter(|r| r.suite == Suite::Security && r.status == TestStatus::Failed)
        .collect();
    if !security_failures.is_empty() {
        let hits: usize = security_failures
            .iter()
            .filter_map(|r| match &r.detail {
                Some(SuiteDetail::Security { pii_hits, .. }) => Some(*pii_hits),
                _ => None,
            })
            .sum();
        alerts.push(Alert::new(
            format!("{run_id}/security/exposure"),
            Some(run_id),
            AlertCategory::Security,
            AlertSeverity::Critical,
            format!("security checks failed with {hits} PII exposure(s)"),
            json!({ "failed_checks": security_failures.len(), "pii_hits": hits }),
            now,
        ));
    }

    alerts
}
