//! Performance regression suite.
//!
//! Measures window-level operational metrics from the interaction log
//! and classifies each against its registered baseline. A metric with
//! no baseline entry is skipped, never compared against a guessed
//! reference. Degraded verdicts fail; improved and stable pass.

use async_trait::async_trait;

use crate::domain::models::{
    BaselineVerdict, Suite, SuiteDetail, TestResult, TestSeverity, TestStatus,
};
use crate::domain::ports::errors::AdapterFault;
use crate::services::baseline;
use crate::services::suites::{SuiteAdapter, SuiteContext};

const SAMPLE_CAP: usize = 10_000;
const BASELINE_TEST_NAME: &str = "performance";

pub struct PerformanceSuite;

struct Measurement {
    metric_name: &'static str,
    value: f64,
}

#[async_trait]
impl SuiteAdapter for PerformanceSuite {
    fn suite(&self) -> Suite {
        Suite::Performance
    }

    #[allow(clippy::cast_precision_loss)]
    async fn run(&self, ctx: &SuiteContext) -> Result<Vec<TestResult>, AdapterFault> {
        let policy = &ctx.policies.performance;
        let interactions = ctx.data.interaction_records(ctx.window, SAMPLE_CAP).await?;

        let mut latencies: Vec<u64> = interactions.iter().filter_map(|i| i.latency_ms).collect();

        if latencies.len() < policy.min_sample {
            return Ok(vec![TestResult::skipped(
                ctx.run_id,
                Suite::Performance,
                "performance_regression",
                format!(
                    "{} latency samples below minimum {}",
                    latencies.len(),
                    policy.min_sample
                ),
                ctx.now,
            )]);
        }

        latencies.sort_unstable();
        let mean_ms =
            latencies.iter().sum::<u64>() as f64 / latencies.len() as f64;
        let p95_index = ((latencies.len() as f64) * 0.95).ceil() as usize - 1;
        let p95_ms = latencies[p95_index.min(latencies.len() - 1)] as f64;
        let positive_rate = interactions.iter().filter(|i| i.positive_outcome).count() as f64
            / interactions.len() as f64;

        let measurements = [
            Measurement {
                metric_name: "avg_response_time_ms",
                value: mean_ms,
            },
            Measurement {
                metric_name: "p95_response_time_ms",
                value: p95_ms,
            },
            Measurement {
                metric_name: "positive_outcome_rate",
                value: positive_rate,
            },
        ];

        let mut results = Vec::new();
        for m in measurements {
            let test_name = format!("baseline_{}", m.metric_name);

            let entry = ctx
                .baselines
                .get(BASELINE_TEST_NAME, m.metric_name)
                .await
                .map_err(AdapterFault::Database)?;

            let Some(entry) = entry else {
                results.push(TestResult::skipped(
                    ctx.run_id,
                    Suite::Performance,
                    test_name,
                    format!("no baseline registered for {}", m.metric_name),
                    ctx.now,
                ));
                continue;
            };

            let verdict = baseline::classify_against(m.value, &entry);
            // Degradation deep past the band fails outright; a shallow
            // one is a warning
            let multiple = match verdict {
                BaselineVerdict::Degraded => baseline::degradation_multiple(m.value, &entry),
                BaselineVerdict::Improved | BaselineVerdict::Stable => 0.0,
            };
            let status = match verdict {
                BaselineVerdict::Degraded if multiple > 2.0 => TestStatus::Failed,
                BaselineVerdict::Degraded => TestStatus::Warning,
                BaselineVerdict::Improved | BaselineVerdict::Stable => TestStatus::Passed,
            };

            let mut result = TestResult::evaluated(
                ctx.run_id,
                Suite::Performance,
                test_name,
                status,
                m.value,
                ctx.now,
            )
            .with_severity(TestSeverity::High)
            .with_detail(SuiteDetail::BaselineComparison {
                metric_name: m.metric_name.to_string(),
                current: m.value,
                baseline: entry.baseline_value,
                tolerance_pct: entry.tolerance_pct,
                verdict: verdict.as_str().to_string(),
                degradation_multiple: multiple,
            });

            if status == TestStatus::Failed {
                result = result.with_error_message(format!(
                    "{} at {:.2} degraded past baseline {:.2} (+/-{:.0}%)",
                    m.metric_name,
                    m.value,
                    entry.baseline_value,
                    entry.tolerance_pct * 100.0
                ));
            }

            results.push(result);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::domain::models::{
        BaselineEntry, Environment, InteractionRecord, MetricDirection, SuitePolicies, TimeWindow,
    };
    use crate::domain::ports::data_source::tests_support::FixedDataSource;
    use crate::domain::ports::errors::DatabaseError;
    use crate::domain::ports::{BaselineRepository, StaticJudge};

    struct FixedBaselines(Vec<BaselineEntry>);

    #[async_trait]
    impl BaselineRepository for FixedBaselines {
        async fn upsert(&self, _entry: &BaselineEntry) -> Result<(), DatabaseError> {
            Ok(())
        }

        async fn get(
            &self,
            test_name: &str,
            metric_name: &str,
        ) -> Result<Option<BaselineEntry>, DatabaseError> {
            Ok(self
                .0
                .iter()
                .find(|e| e.test_name == test_name && e.metric_name == metric_name)
                .cloned())
        }

        async fn list(&self) -> Result<Vec<BaselineEntry>, DatabaseError> {
            Ok(self.0.clone())
        }
    }

    fn interaction(latency_ms: u64) -> InteractionRecord {
        InteractionRecord {
            id: Uuid::new_v4().to_string(),
            insight_id: None,
            user_role: None,
            department: None,
            region: None,
            seniority: None,
            gender: None,
            positive_outcome: true,
            relevance_score: None,
            feedback_score: None,
            latency_ms: Some(latency_ms),
            created_at: Utc::now() - Duration::hours(1),
        }
    }

    fn context(latencies: &[u64], baselines: Vec<BaselineEntry>) -> SuiteContext {
        let now = Utc::now();
        SuiteContext {
            run_id: Uuid::new_v4(),
            environment: Environment::Development,
            window: TimeWindow::ending_at(now, 24),
            now,
            judge: Arc::new(StaticJudge::default()),
            data: Arc::new(FixedDataSource {
                interactions: latencies.iter().map(|ms| interaction(*ms)).collect(),
                ..FixedDataSource::default()
            }),
            baselines: Arc::new(FixedBaselines(baselines)),
            policies: SuitePolicies::default(),
        }
    }

    #[tokio::test]
    async fn missing_baseline_skips_metric() {
        let ctx = context(&[100; 20], Vec::new());
        let results = PerformanceSuite.run(&ctx).await.unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.status == TestStatus::Skipped));
    }

    #[tokio::test]
    async fn deep_degradation_fails() {
        let entry = BaselineEntry::new(
            "performance",
            "avg_response_time_ms",
            100.0,
            0.1,
            MetricDirection::LowerIsBetter,
        );
        // Every sample at 130ms: three times a 10% band
        let ctx = context(&[130; 20], vec![entry]);
        let results = PerformanceSuite.run(&ctx).await.unwrap();
        let r = results
            .iter()
            .find(|r| r.test_name == "baseline_avg_response_time_ms")
            .unwrap();
        assert_eq!(r.status, TestStatus::Failed);
        match r.detail.as_ref().unwrap() {
            SuiteDetail::BaselineComparison {
                verdict,
                degradation_multiple,
                ..
            } => {
                assert_eq!(verdict, "degraded");
                assert!((degradation_multiple - 3.0).abs() < 1e-9);
            }
            other => panic!("unexpected detail {other:?}"),
        }
    }

    #[tokio::test]
    async fn shallow_degradation_warns() {
        let entry = BaselineEntry::new(
            "performance",
            "avg_response_time_ms",
            100.0,
            0.1,
            MetricDirection::LowerIsBetter,
        );
        // 115ms on a 10% band: degraded, but only 1.5x the tolerance
        let ctx = context(&[115; 20], vec![entry]);
        let results = PerformanceSuite.run(&ctx).await.unwrap();
        let r = results
            .iter()
            .find(|r| r.test_name == "baseline_avg_response_time_ms")
            .unwrap();
        assert_eq!(r.status, TestStatus::Warning);
        assert!(r.error_message.is_none());
        assert!(r.is_well_formed());
    }

    #[tokio::test]
    async fn stable_latency_passes() {
        let entry = BaselineEntry::new(
            "performance",
            "avg_response_time_ms",
            100.0,
            0.1,
            MetricDirection::LowerIsBetter,
        );
        let ctx = context(&[100; 20], vec![entry]);
        let results = PerformanceSuite.run(&ctx).await.unwrap();
        let r = results
            .iter()
            .find(|r| r.test_name == "baseline_avg_response_time_ms")
            .unwrap();
        assert_eq!(r.status, TestStatus::Passed);
    }
}
