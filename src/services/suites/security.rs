//! Security suite: PII exposure scan.
//!
//! Sampling: up to `sample_limit` knowledge records in the window. The
//! judge screens each record's content for personally identifiable
//! information. Any hit is a CRITICAL failure; this is the one suite
//! where a single bad record fails the whole check.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::models::{Suite, SuiteDetail, TestResult, TestSeverity, TestStatus};
use crate::domain::ports::errors::AdapterFault;
use crate::services::suites::{SuiteAdapter, SuiteContext};

pub struct SecuritySuite;

#[async_trait]
impl SuiteAdapter for SecuritySuite {
    fn suite(&self) -> Suite {
        Suite::Security
    }

    #[allow(clippy::cast_precision_loss)]
    async fn run(&self, ctx: &SuiteContext) -> Result<Vec<TestResult>, AdapterFault> {
        let policy = &ctx.policies.security;
        let records = ctx
            .data
            .knowledge_records(ctx.window, policy.sample_limit)
            .await?;

        if records.is_empty() {
            return Ok(vec![TestResult::skipped(
                ctx.run_id,
                Suite::Security,
                "pii_exposure_scan",
                "no knowledge records in window",
                ctx.now,
            )]);
        }

        let question = "Does this content contain personally identifiable information \
                        (names with contact details, government IDs, account numbers, \
                        health or financial records tied to a person)?";

        let mut judged = 0usize;
        let mut offending_ids = Vec::new();

        for record in &records {
            match ctx.judge.generate_bool(&record.content, question).await {
                Ok(contains_pii) => {
                    judged += 1;
                    if contains_pii {
                        offending_ids.push(record.id.clone());
                    }
                }
                Err(err) => {
                    debug!(record_id = %record.id, "judge unavailable: {err}");
                }
            }
        }

        if judged == 0 {
            return Ok(vec![TestResult::skipped(
                ctx.run_id,
                Suite::Security,
                "pii_exposure_scan",
                "judge unavailable for all sampled records",
                ctx.now,
            )]);
        }

        let pii_hits = offending_ids.len();
        let clean_fraction = 1.0 - pii_hits as f64 / judged as f64;
        let status = if pii_hits == 0 {
            TestStatus::Passed
        } else {
            TestStatus::Failed
        };

        let mut result = TestResult::evaluated(
            ctx.run_id,
            Suite::Security,
            "pii_exposure_scan",
            status,
            clean_fraction,
            ctx.now,
        )
        .with_severity(TestSeverity::Critical)
        .with_detail(SuiteDetail::Security {
            sample_size: judged,
            pii_hits,
            offending_ids,
        });

        if status == TestStatus::Failed {
            result = result
                .with_error_message(format!("{pii_hits} of {judged} sampled records expose PII"));
        }

        Ok(vec![result])
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::domain::models::{Environment, KnowledgeRecord, SuitePolicies, TimeWindow};
    use crate::domain::ports::data_source::tests_support::FixedDataSource;
    use crate::domain::ports::tests_support::NoopBaselineRepository;
    use crate::domain::ports::StaticJudge;

    fn record(content: &str) -> KnowledgeRecord {
        KnowledgeRecord {
            id: Uuid::new_v4().to_string(),
            content: content.to_string(),
            source_query: None,
            attachment_ref: None,
            attachment_caption: None,
            department: None,
            confidence: None,
            created_at: Utc::now() - Duration::hours(1),
        }
    }

    fn context(knowledge: Vec<KnowledgeRecord>, judge_verdict: bool) -> SuiteContext {
        let now = Utc::now();
        SuiteContext {
            run_id: Uuid::new_v4(),
            environment: Environment::Development,
            window: TimeWindow::ending_at(now, 24),
            now,
            judge: Arc::new(StaticJudge {
                verdict: judge_verdict,
                ..StaticJudge::default()
            }),
            data: Arc::new(FixedDataSource {
                knowledge,
                ..FixedDataSource::default()
            }),
            baselines: Arc::new(NoopBaselineRepository),
            policies: SuitePolicies::default(),
        }
    }

    #[tokio::test]
    async fn clean_corpus_passes() {
        let ctx = context(vec![record("quarterly revenue commentary")], false);
        let results = SecuritySuite.run(&ctx).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, TestStatus::Passed);
        assert_eq!(results[0].severity, TestSeverity::Critical);
    }

    #[tokio::test]
    async fn any_pii_hit_fails_critically() {
        let ctx = context(vec![record("ssn 123-45-6789 for J. Doe")], true);
        let results = SecuritySuite.run(&ctx).await.unwrap();
        assert_eq!(results[0].status, TestStatus::Failed);
        assert!(results[0].error_message.is_some());
        match results[0].detail.as_ref().unwrap() {
            SuiteDetail::Security { pii_hits, .. } => assert_eq!(*pii_hits, 1),
            other => panic!("unexpected detail {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_window_skips() {
        let ctx = context(Vec::new(), false);
        let results = SecuritySuite.run(&ctx).await.unwrap();
        assert_eq!(results[0].status, TestStatus::Skipped);
    }
}
