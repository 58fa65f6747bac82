//! Predictive calibration suite.
//!
//! Sampling: up to `sample_limit` insights generated in the window.
//! Compares the mean confidence the generator stated against the rate
//! at which the judge deems the insights correct; the check score is
//! the absolute calibration error (lower is better).

use async_trait::async_trait;
use tracing::debug;

use crate::domain::models::{Suite, SuiteDetail, TestResult, TestSeverity, TestStatus};
use crate::domain::ports::errors::AdapterFault;
use crate::services::suites::{SuiteAdapter, SuiteContext};

pub struct PredictiveSuite;

#[async_trait]
impl SuiteAdapter for PredictiveSuite {
    fn suite(&self) -> Suite {
        Suite::Predictive
    }

    #[allow(clippy::cast_precision_loss)]
    async fn run(&self, ctx: &SuiteContext) -> Result<Vec<TestResult>, AdapterFault> {
        let policy = &ctx.policies.predictive;
        let insights = ctx
            .data
            .insight_records(ctx.window, policy.sample_limit)
            .await?;

        if insights.is_empty() {
            return Ok(vec![TestResult::skipped(
                ctx.run_id,
                Suite::Predictive,
                "insight_confidence_calibration",
                "no insights generated in window",
                ctx.now,
            )]);
        }

        let mut judged = 0usize;
        let mut correct = 0usize;
        let mut confidence_sum = 0.0f64;

        for insight in &insights {
            let question =
                "Is this insight factually plausible and internally consistent?".to_string();
            match ctx.judge.generate_bool(&insight.content, &question).await {
                Ok(verdict) => {
                    judged += 1;
                    confidence_sum += insight.confidence;
                    if verdict {
                        correct += 1;
                    }
                }
                Err(err) => {
                    debug!(insight_id = %insight.id, "judge unavailable: {err}");
                }
            }
        }

        if judged == 0 {
            return Ok(vec![TestResult::skipped(
                ctx.run_id,
                Suite::Predictive,
                "insight_confidence_calibration",
                "judge unavailable for all sampled insights",
                ctx.now,
            )]);
        }

        let mean_confidence = confidence_sum / judged as f64;
        let judged_rate = correct as f64 / judged as f64;
        let calibration_error = (mean_confidence - judged_rate).abs();

        let status = if calibration_error <= policy.pass_calibration_error {
            TestStatus::Passed
        } else if calibration_error <= policy.warn_calibration_error {
            TestStatus::Warning
        } else {
            TestStatus::Failed
        };

        let mut result = TestResult::evaluated(
            ctx.run_id,
            Suite::Predictive,
            "insight_confidence_calibration",
            status,
            calibration_error,
            ctx.now,
        )
        .with_severity(TestSeverity::Medium)
        .with_detail(SuiteDetail::Calibration {
            sample_size: judged,
            mean_confidence,
            judged_rate,
            calibration_error,
        });

        if status == TestStatus::Failed {
            result = result.with_error_message(format!(
                "calibration error {calibration_error:.3} exceeds {:.2}",
                policy.warn_calibration_error
            ));
        }

        Ok(vec![result])
    }
}
