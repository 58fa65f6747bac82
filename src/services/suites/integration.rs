//! Integration suite: cross-store referential consistency.
//!
//! Sampling: whole window, no cap. Insights must point at knowledge
//! records that exist; interactions must point at insights that exist.
//! The check score is the dangling-reference fraction (lower is
//! better). References outside the window cannot be distinguished from
//! genuinely dangling ones, so the lookup set is the full window on
//! both sides of each edge.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::models::{Suite, SuiteDetail, TestResult, TestSeverity, TestStatus};
use crate::domain::ports::errors::AdapterFault;
use crate::services::suites::{SuiteAdapter, SuiteContext};

const SAMPLE_CAP: usize = 10_000;

pub struct IntegrationSuite;

#[allow(clippy::cast_precision_loss)]
fn consistency_result(
    ctx: &SuiteContext,
    test_name: &str,
    checked: usize,
    dangling: usize,
) -> TestResult {
    let policy = &ctx.policies.integration;

    if checked == 0 {
        return TestResult::skipped(
            ctx.run_id,
            Suite::Integration,
            test_name,
            "no references to check in window",
            ctx.now,
        );
    }

    let fraction = dangling as f64 / checked as f64;
    let status = if fraction <= policy.pass_dangling_fraction {
        TestStatus::Passed
    } else if fraction <= policy.warn_dangling_fraction {
        TestStatus::Warning
    } else {
        TestStatus::Failed
    };

    let mut result = TestResult::evaluated(
        ctx.run_id,
        Suite::Integration,
        test_name,
        status,
        fraction,
        ctx.now,
    )
    .with_severity(TestSeverity::High)
    .with_detail(SuiteDetail::Consistency { checked, dangling });

    if status == TestStatus::Failed {
        result = result.with_error_message(format!(
            "{dangling} of {checked} references dangle ({:.1}% > {:.1}%)",
            fraction * 100.0,
            policy.warn_dangling_fraction * 100.0
        ));
    }

    result
}

#[async_trait]
impl SuiteAdapter for IntegrationSuite {
    fn suite(&self) -> Suite {
        Suite::Integration
    }

    async fn run(&self, ctx: &SuiteContext) -> Result<Vec<TestResult>, AdapterFault> {
        let knowledge = ctx.data.knowledge_records(ctx.window, SAMPLE_CAP).await?;
        let insights = ctx.data.insight_records(ctx.window, SAMPLE_CAP).await?;
        let interactions = ctx.data.interaction_records(ctx.window, SAMPLE_CAP).await?;

        let knowledge_ids: HashSet<&str> = knowledge.iter().map(|k| k.id.as_str()).collect();
        let insight_ids: HashSet<&str> = insights.iter().map(|i| i.id.as_str()).collect();

        let mut insight_checked = 0usize;
        let mut insight_dangling = 0usize;
        for insight in &insights {
            if let Some(knowledge_id) = insight.knowledge_id.as_deref() {
                insight_checked += 1;
                if !knowledge_ids.contains(knowledge_id) {
                    insight_dangling += 1;
                }
            }
        }

        let mut interaction_checked = 0usize;
        let mut interaction_dangling = 0usize;
        for interaction in &interactions {
            if let Some(insight_id) = interaction.insight_id.as_deref() {
                interaction_checked += 1;
                if !insight_ids.contains(insight_id) {
                    interaction_dangling += 1;
                }
            }
        }

        Ok(vec![
            consistency_result(
                ctx,
                "insight_knowledge_references",
                insight_checked,
                insight_dangling,
            ),
            consistency_result(
                ctx,
                "interaction_insight_references",
                interaction_checked,
                interaction_dangling,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::domain::models::{
        Environment, InsightRecord, KnowledgeRecord, SuitePolicies, TimeWindow,
    };
    use crate::domain::ports::data_source::tests_support::FixedDataSource;
    use crate::domain::ports::tests_support::NoopBaselineRepository;
    use crate::domain::ports::StaticJudge;

    fn knowledge(id: &str) -> KnowledgeRecord {
        KnowledgeRecord {
            id: id.to_string(),
            content: "doc".to_string(),
            source_query: None,
            attachment_ref: None,
            attachment_caption: None,
            department: None,
            confidence: None,
            created_at: Utc::now() - Duration::hours(1),
        }
    }

    fn insight(id: &str, knowledge_id: Option<&str>) -> InsightRecord {
        InsightRecord {
            id: id.to_string(),
            knowledge_id: knowledge_id.map(str::to_string),
            content: "insight".to_string(),
            confidence: 0.8,
            department: None,
            target_role: None,
            created_at: Utc::now() - Duration::hours(1),
        }
    }

    fn context(data: FixedDataSource) -> SuiteContext {
        let now = Utc::now();
        SuiteContext {
            run_id: Uuid::new_v4(),
            environment: Environment::Development,
            window: TimeWindow::ending_at(now, 24),
            now,
            judge: Arc::new(StaticJudge::default()),
            data: Arc::new(data),
            baselines: Arc::new(NoopBaselineRepository),
            policies: SuitePolicies::default(),
        }
    }

    #[tokio::test]
    async fn consistent_references_pass() {
        let ctx = context(FixedDataSource {
            knowledge: vec![knowledge("k1")],
            insights: vec![insight("i1", Some("k1"))],
            ..FixedDataSource::default()
        });
        let results = IntegrationSuite.run(&ctx).await.unwrap();
        let r = results
            .iter()
            .find(|r| r.test_name == "insight_knowledge_references")
            .unwrap();
        assert_eq!(r.status, TestStatus::Passed);
    }

    #[tokio::test]
    async fn dangling_reference_fails() {
        let ctx = context(FixedDataSource {
            knowledge: vec![knowledge("k1")],
            insights: vec![insight("i1", Some("k1")), insight("i2", Some("k-gone"))],
            ..FixedDataSource::default()
        });
        let results = IntegrationSuite.run(&ctx).await.unwrap();
        let r = results
            .iter()
            .find(|r| r.test_name == "insight_knowledge_references")
            .unwrap();
        // 1 of 2 dangling, far over the 2% warn band
        assert_eq!(r.status, TestStatus::Failed);
        match r.detail.as_ref().unwrap() {
            SuiteDetail::Consistency { checked, dangling } => {
                assert_eq!((*checked, *dangling), (2, 1));
            }
            other => panic!("unexpected detail {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_references_skip() {
        let ctx = context(FixedDataSource::default());
        let results = IntegrationSuite.run(&ctx).await.unwrap();
        assert!(results.iter().all(|r| r.status == TestStatus::Skipped));
    }
}
