//! Personalization relevance suite.
//!
//! Sampling: interactions in the window grouped by department segment.
//! Each segment with enough traffic gets its own check on mean
//! delivered-insight relevance; segments below the minimum sample are
//! skipped individually.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::models::{Suite, SuiteDetail, TestResult, TestSeverity};
use crate::domain::ports::errors::AdapterFault;
use crate::services::suites::{grade_by_threshold, SuiteAdapter, SuiteContext};

const SAMPLE_CAP: usize = 5_000;

pub struct PersonalizationSuite;

#[async_trait]
impl SuiteAdapter for PersonalizationSuite {
    fn suite(&self) -> Suite {
        Suite::Personalization
    }

    #[allow(clippy::cast_precision_loss)]
    async fn run(&self, ctx: &SuiteContext) -> Result<Vec<TestResult>, AdapterFault> {
        let policy = &ctx.policies.personalization;
        let interactions = ctx.data.interaction_records(ctx.window, SAMPLE_CAP).await?;

        if interactions.is_empty() {
            return Ok(vec![TestResult::skipped(
                ctx.run_id,
                Suite::Personalization,
                "segment_relevance",
                "no interactions in window",
                ctx.now,
            )]);
        }

        // BTreeMap for deterministic per-segment result ordering
        let mut segments: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for interaction in &interactions {
            if let (Some(department), Some(score)) =
                (&interaction.department, interaction.relevance_score)
            {
                segments.entry(department.clone()).or_default().push(score);
            }
        }

        if segments.is_empty() {
            return Ok(vec![TestResult::skipped(
                ctx.run_id,
                Suite::Personalization,
                "segment_relevance",
                "no interactions carry department and relevance data",
                ctx.now,
            )]);
        }

        let mut results = Vec::new();
        for (segment, scores) in &segments {
            let test_name = format!("segment_relevance_{segment}");

            if scores.len() < policy.min_segment_sample {
                results.push(TestResult::skipped(
                    ctx.run_id,
                    Suite::Personalization,
                    test_name,
                    format!(
                        "{} samples below minimum {}",
                        scores.len(),
                        policy.min_segment_sample
                    ),
                    ctx.now,
                ));
                continue;
            }

            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            let status = grade_by_threshold(mean, policy.pass_relevance, policy.warn_relevance);

            let mut result = TestResult::evaluated(
                ctx.run_id,
                Suite::Personalization,
                test_name,
                status,
                mean,
                ctx.now,
            )
            .with_severity(TestSeverity::Medium)
            .with_detail(SuiteDetail::Accuracy {
                sample_size: scores.len(),
                accurate: scores.iter().filter(|s| **s >= policy.pass_relevance).count(),
                accuracy: mean,
            });

            if status == crate::domain::models::TestStatus::Failed {
                result = result.with_error_message(format!(
                    "segment {segment} mean relevance {mean:.3} below {:.2}",
                    policy.warn_relevance
                ));
            }

            results.push(result);
        }

        Ok(results)
    }
}
