//! Multimodal agreement suite.
//!
//! Sampling: knowledge records in the window that carry an attachment
//! reference and a caption. The judge confirms the caption plausibly
//! describes the referenced artifact given the surrounding content.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::models::{Suite, SuiteDetail, TestResult, TestSeverity};
use crate::domain::ports::errors::AdapterFault;
use crate::services::suites::{grade_by_threshold, SuiteAdapter, SuiteContext};

pub struct MultimodalSuite;

#[async_trait]
impl SuiteAdapter for MultimodalSuite {
    fn suite(&self) -> Suite {
        Suite::Multimodal
    }

    #[allow(clippy::cast_precision_loss)]
    async fn run(&self, ctx: &SuiteContext) -> Result<Vec<TestResult>, AdapterFault> {
        let policy = &ctx.policies.multimodal;
        let records = ctx
            .data
            .knowledge_records(ctx.window, policy.sample_limit)
            .await?;

        let candidates: Vec<_> = records
            .iter()
            .filter(|r| r.attachment_ref.is_some() && r.attachment_caption.is_some())
            .collect();

        if candidates.is_empty() {
            return Ok(vec![TestResult::skipped(
                ctx.run_id,
                Suite::Multimodal,
                "artifact_caption_agreement",
                "no records with attachments in window",
                ctx.now,
            )]);
        }

        let mut judged = 0usize;
        let mut agreeing = 0usize;

        for record in &candidates {
            let caption = record.attachment_caption.as_deref().unwrap_or_default();
            let context = format!("Document: {}\nCaption: {caption}", record.content);
            let question =
                "Is the caption consistent with the document's description of the artifact?";
            match ctx.judge.generate_bool(&context, question).await {
                Ok(verdict) => {
                    judged += 1;
                    if verdict {
                        agreeing += 1;
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
                Suite::Multimodal,
                "artifact_caption_agreement",
                "judge unavailable for all sampled artifacts",
                ctx.now,
            )]);
        }

        let agreement = agreeing as f64 / judged as f64;
        let status = grade_by_threshold(agreement, policy.pass_threshold, policy.warn_threshold);

        let mut result = TestResult::evaluated(
            ctx.run_id,
            Suite::Multimodal,
            "artifact_caption_agreement",
            status,
            agreement,
            ctx.now,
        )
        .with_severity(TestSeverity::Medium)
        .with_detail(SuiteDetail::Accuracy {
            sample_size: judged,
            accurate: agreeing,
            accuracy: agreement,
        });

        if status == crate::domain::models::TestStatus::Failed {
            result = result.with_error_message(format!(
                "caption agreement {agreement:.3} below {:.2}",
                policy.warn_threshold
            ));
        }

        Ok(vec![result])
    }
}
