//! Semantic accuracy suite.
//!
//! Sampling: up to `sample_limit` knowledge records created in the
//! window that carry a source query. For each sampled record the judge
//! answers whether the stored content actually addresses the query;
//! the suite score is the fraction judged accurate.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::models::{Suite, SuiteDetail, TestResult, TestSeverity};
use crate::domain::ports::errors::AdapterFault;
use crate::services::suites::{grade_by_threshold, SuiteAdapter, SuiteContext};

pub struct SemanticSuite;

#[async_trait]
impl SuiteAdapter for SemanticSuite {
    fn suite(&self) -> Suite {
        Suite::Semantic
    }

    async fn run(&self, ctx: &SuiteContext) -> Result<Vec<TestResult>, AdapterFault> {
        let policy = &ctx.policies.semantic;
        let records = ctx
            .data
            .knowledge_records(ctx.window, policy.sample_limit)
            .await?;

        let candidates: Vec<_> = records
            .iter()
            .filter(|r| r.source_query.as_deref().is_some_and(|q| !q.is_empty()))
            .collect();

        if candidates.is_empty() {
            return Ok(vec![TestResult::skipped(
                ctx.run_id,
                Suite::Semantic,
                "semantic_retrieval_accuracy",
                "no knowledge records with source queries in window",
                ctx.now,
            )]);
        }

        let mut judged = 0usize;
        let mut accurate = 0usize;
        let mut judge_failures = 0usize;

        for record in &candidates {
            let query = record.source_query.as_deref().unwrap_or_default();
            let question =
                format!("Does this content accurately and completely address the query: {query}?");
            match ctx.judge.generate_bool(&record.content, &question).await {
                Ok(verdict) => {
                    judged += 1;
                    if verdict {
                        accurate += 1;
                    }
                }
                Err(err) => {
                    debug!(record_id = %record.id, "judge unavailable for record: {err}");
                    judge_failures += 1;
                }
            }
        }

        // Judge outage across the whole sample: cannot evaluate, skip
        if judged == 0 {
            return Ok(vec![TestResult::skipped(
                ctx.run_id,
                Suite::Semantic,
                "semantic_retrieval_accuracy",
                format!("judge unavailable for all {judge_failures} sampled records"),
                ctx.now,
            )]);
        }

        #[allow(clippy::cast_precision_loss)]
        let accuracy = accurate as f64 / judged as f64;
        let status = grade_by_threshold(accuracy, policy.pass_threshold, policy.warn_threshold);

        let mut result = TestResult::evaluated(
            ctx.run_id,
            Suite::Semantic,
            "semantic_retrieval_accuracy",
            status,
            accuracy,
            ctx.now,
        )
        .with_severity(TestSeverity::High)
        .with_detail(SuiteDetail::Accuracy {
            sample_size: judged,
            accurate,
            accuracy,
        });

        if status == crate::domain::models::TestStatus::Failed {
            result = result.with_error_message(format!(
                "semantic accuracy {accuracy:.3} below warning threshold {:.2}",
                policy.warn_threshold
            ));
        }

        Ok(vec![result])
    }
}
