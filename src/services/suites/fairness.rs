//! Fairness suite: demographic parity and equal opportunity across
//! protected attributes.
//!
//! Sampling: all interactions in the window. Partitions by gender,
//! seniority, department, and region; each group large enough to
//! evaluate gets one result. Groups under the minimum sample are
//! skipped individually, never silently folded into a pass.
//!
//! Demographic parity is |group positive-outcome rate - overall rate|.
//! Equal opportunity restricts the same comparison to interactions the
//! platform itself scored as relevant (relevance >= 0.7), a proxy for
//! the qualified population. A check fails when either delta exceeds
//! the fail threshold and warns when either exceeds the warn threshold.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::models::{
    InteractionRecord, Suite, SuiteDetail, TestResult, TestSeverity, TestStatus,
};
use crate::domain::ports::errors::AdapterFault;
use crate::services::suites::{SuiteAdapter, SuiteContext};

const SAMPLE_CAP: usize = 10_000;
const RELEVANCE_QUALIFIED: f64 = 0.7;

const ATTRIBUTES: [&str; 4] = ["gender", "seniority", "department", "region"];

pub struct FairnessSuite;

fn attribute_value<'a>(interaction: &'a InteractionRecord, attribute: &str) -> Option<&'a str> {
    match attribute {
        "gender" => interaction.gender.as_deref(),
        "seniority" => interaction.seniority.as_deref(),
        "department" => interaction.department.as_deref(),
        "region" => interaction.region.as_deref(),
        _ => None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn positive_rate(interactions: &[&InteractionRecord]) -> Option<f64> {
    if interactions.is_empty() {
        return None;
    }
    let positive = interactions.iter().filter(|i| i.positive_outcome).count();
    Some(positive as f64 / interactions.len() as f64)
}

fn is_qualified(interaction: &InteractionRecord) -> bool {
    interaction
        .relevance_score
        .is_some_and(|s| s >= RELEVANCE_QUALIFIED)
}

#[async_trait]
impl SuiteAdapter for FairnessSuite {
    fn suite(&self) -> Suite {
        Suite::Fairness
    }

    async fn run(&self, ctx: &SuiteContext) -> Result<Vec<TestResult>, AdapterFault> {
        let policy = &ctx.policies.fairness;
        let interactions = ctx.data.interaction_records(ctx.window, SAMPLE_CAP).await?;

        if interactions.len() < policy.min_group_sample {
            return Ok(vec![TestResult::skipped(
                ctx.run_id,
                Suite::Fairness,
                "fairness_overall",
                format!(
                    "{} interactions below minimum {} for any fairness assertion",
                    interactions.len(),
                    policy.min_group_sample
                ),
                ctx.now,
            )]);
        }

        let all: Vec<&InteractionRecord> = interactions.iter().collect();
        let qualified: Vec<&InteractionRecord> = interactions
            .iter()
            .filter(|i| is_qualified(i))
            .collect();

        // Guaranteed by the size check above
        let overall_rate = positive_rate(&all).unwrap_or(0.0);
        let overall_qualified_rate = positive_rate(&qualified);

        let mut results = Vec::new();

        for attribute in ATTRIBUTES {
            let mut groups: BTreeMap<&str, Vec<&InteractionRecord>> = BTreeMap::new();
            for interaction in &interactions {
                if let Some(value) = attribute_value(interaction, attribute) {
                    groups.entry(value).or_default().push(interaction);
                }
            }

            for (group, members) in &groups {
                let test_name = format!("fairness_{attribute}_{group}");

                if members.len() < policy.min_group_sample {
                    results.push(TestResult::skipped(
                        ctx.run_id,
                        Suite::Fairness,
                        test_name,
                        format!(
                            "group size {} below minimum {}",
                            members.len(),
                            policy.min_group_sample
                        ),
                        ctx.now,
                    ));
                    continue;
                }

                // unwrap_or unreachable: members is non-empty here
                let group_rate = positive_rate(members).unwrap_or(0.0);
                let parity = (group_rate - overall_rate).abs();

                let group_qualified: Vec<&InteractionRecord> = members
                    .iter()
                    .copied()
                    .filter(|i| is_qualified(i))
                    .collect();
                let equal_opportunity = match (
                    positive_rate(&group_qualified),
                    overall_qualified_rate,
                ) {
                    (Some(group_q), Some(overall_q))
                        if group_qualified.len() >= policy.min_group_sample =>
                    {
                        Some((group_q - overall_q).abs())
                    }
                    _ => None,
                };

                let worst = equal_opportunity.map_or(parity, |eo| parity.max(eo));
                let status = if worst > policy.fail_threshold {
                    TestStatus::Failed
                } else if worst > policy.warn_threshold {
                    TestStatus::Warning
                } else {
                    TestStatus::Passed
                };
                let violation = worst > policy.warn_threshold;

                let mut result = TestResult::evaluated(
                    ctx.run_id,
                    Suite::Fairness,
                    test_name,
                    status,
                    parity,
                    ctx.now,
                )
                .with_severity(TestSeverity::High)
                .with_detail(SuiteDetail::Fairness {
                    attribute: attribute.to_string(),
                    group: (*group).to_string(),
                    group_size: members.len(),
                    group_rate,
                    overall_rate,
                    demographic_parity: parity,
                    equal_opportunity,
                    violation,
                });

                if status == TestStatus::Failed {
                    result = result.with_error_message(format!(
                        "{attribute}={group} disparity {worst:.3} exceeds {:.2}",
                        policy.fail_threshold
                    ));
                }

                results.push(result);
            }
        }

        Ok(results)
    }
}
