//! Real-time responsiveness suite.
//!
//! Sampling: all interactions in the window (bounded by a generous
//! cap). Two checks: p95 serving latency against the suite threshold,
//! and pipeline freshness (an empty recent window on a live system is
//! a staleness warning, not a pass).

use async_trait::async_trait;

use crate::domain::models::{Suite, SuiteDetail, TestResult, TestSeverity, TestStatus};
use crate::domain::ports::errors::AdapterFault;
use crate::services::suites::{SuiteAdapter, SuiteContext};

const SAMPLE_CAP: usize = 5_000;

pub struct RealtimeSuite;

#[async_trait]
impl SuiteAdapter for RealtimeSuite {
    fn suite(&self) -> Suite {
        Suite::Realtime
    }

    #[allow(clippy::cast_precision_loss)]
    async fn run(&self, ctx: &SuiteContext) -> Result<Vec<TestResult>, AdapterFault> {
        let policy = &ctx.policies.realtime;
        let interactions = ctx.data.interaction_records(ctx.window, SAMPLE_CAP).await?;

        let mut results = Vec::new();

        // Freshness: no traffic at all in the window is suspicious
        if interactions.is_empty() {
            results.push(
                TestResult::evaluated(
                    ctx.run_id,
                    Suite::Realtime,
                    "interaction_freshness",
                    TestStatus::Warning,
                    0.0,
                    ctx.now,
                )
                .with_severity(TestSeverity::Medium)
                .with_detail(SuiteDetail::Note {
                    reason: "no interactions recorded in window".to_string(),
                }),
            );
            return Ok(results);
        }

        results.push(
            TestResult::evaluated(
                ctx.run_id,
                Suite::Realtime,
                "interaction_freshness",
                TestStatus::Passed,
                1.0,
                ctx.now,
            )
            .with_severity(TestSeverity::Low),
        );

        // Latency: p95 over interactions that carry a measurement
        let mut latencies: Vec<u64> = interactions.iter().filter_map(|i| i.latency_ms).collect();

        if latencies.len() < policy.min_sample {
            results.push(TestResult::skipped(
                ctx.run_id,
                Suite::Realtime,
                "serving_latency_p95",
                format!(
                    "{} latency samples below minimum {}",
                    latencies.len(),
                    policy.min_sample
                ),
                ctx.now,
            ));
            return Ok(results);
        }

        latencies.sort_unstable();
        let p95_index = ((latencies.len() as f64) * 0.95).ceil() as usize - 1;
        let p95_ms = latencies[p95_index.min(latencies.len() - 1)] as f64;

        let status = if p95_ms <= policy.p95_latency_threshold_ms {
            TestStatus::Passed
        } else if p95_ms <= policy.p95_latency_threshold_ms * 1.5 {
            TestStatus::Warning
        } else {
            TestStatus::Failed
        };

        let mut result = TestResult::evaluated(
            ctx.run_id,
            Suite::Realtime,
            "serving_latency_p95",
            status,
            p95_ms,
            ctx.now,
        )
        .with_severity(TestSeverity::High)
        .with_detail(SuiteDetail::Latency {
            sample_size: latencies.len(),
            p95_ms,
            threshold_ms: policy.p95_latency_threshold_ms,
        });

        if status == TestStatus::Failed {
            result = result.with_error_message(format!(
                "p95 latency {p95_ms:.0}ms exceeds 1.5x threshold {:.0}ms",
                policy.p95_latency_threshold_ms
            ));
        }

        results.push(result);
        Ok(results)
    }
}
