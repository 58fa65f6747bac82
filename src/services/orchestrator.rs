//! Run orchestrator.
//!
//! Dispatches the selected suites over one shared context, isolates
//! each suite's failures, and closes the run with exactly one summary.
//! A suite fault or timeout becomes a single ERROR result; it never
//! takes down the run or the other suites.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::models::{
    Environment, OrchestratorConfig, RunStatus, RunSummary, Suite, SuitePolicies, TestResult,
    TimeWindow,
};
use crate::domain::ports::{
    BaselineRepository, DataSource, Judge, ResultRepository, SummaryRepository,
};
use crate::services::suites::{
    FairnessSuite, IntegrationSuite, MultimodalSuite, PerformanceSuite, PersonalizationSuite,
    PredictiveSuite, RealtimeSuite, SecuritySuite, SemanticSuite, SuiteAdapter, SuiteContext,
};

/// One orchestration request, fully explicit.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// `None` selects all nine suites. An explicit empty selection
    /// dispatches nothing and closes an empty run.
    pub suites: Option<Vec<Suite>>,
    pub environment: Environment,
    pub parallel: bool,
    /// Sampling window length handed to the adapters
    pub window_hours: i64,
}

impl Default for RunRequest {
    fn default() -> Self {
        Self {
            suites: None,
            environment: Environment::Development,
            parallel: false,
            window_hours: 24,
        }
    }
}

pub struct Orchestrator {
    results: Arc<dyn ResultRepository>,
    summaries: Arc<dyn SummaryRepository>,
    baselines: Arc<dyn BaselineRepository>,
    data: Arc<dyn DataSource>,
    judge: Arc<dyn Judge>,
    config: OrchestratorConfig,
    policies: SuitePolicies,
    /// Set by the signal handler; checked before each suite dispatch
    cancel: Arc<AtomicBool>,
}

fn adapter_for(suite: Suite) -> Box<dyn SuiteAdapter> {
    match suite {
        Suite::Semantic => Box::new(SemanticSuite),
        Suite::Predictive => Box::new(PredictiveSuite),
        Suite::Multimodal => Box::new(MultimodalSuite),
        Suite::Realtime => Box::new(RealtimeSuite),
        Suite::Personalization => Box::new(PersonalizationSuite),
        Suite::Fairness => Box::new(FairnessSuite),
        Suite::Security => Box::new(SecuritySuite),
        Suite::Integration => Box::new(IntegrationSuite),
        Suite::Performance => Box::new(PerformanceSuite),
    }
}

/// Outcome of one suite dispatch.
enum SuiteOutcome {
    /// Adapter ran to completion (its results may still be failures)
    Completed(Vec<TestResult>),
    /// Fault or timeout, converted to one ERROR result
    Errored(TestResult),
    /// Cancellation arrived before this suite was dispatched
    NotDispatched,
}

impl Orchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        results: Arc<dyn ResultRepository>,
        summaries: Arc<dyn SummaryRepository>,
        baselines: Arc<dyn BaselineRepository>,
        data: Arc<dyn DataSource>,
        judge: Arc<dyn Judge>,
        config: OrchestratorConfig,
        policies: SuitePolicies,
    ) -> Self {
        Self {
            results,
            summaries,
            baselines,
            data,
            judge,
            config,
            policies,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag the signal handler flips to request cancellation.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Execute one run. `now` is sampled once at the boundary and is
    /// both the window end and the timestamp on every result.
    pub async fn run(&self, request: &RunRequest, now: DateTime<Utc>) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        let selection: Vec<Suite> = match &request.suites {
            None => Suite::ALL.to_vec(),
            Some(suites) => suites.clone(),
        };

        info!(
            %run_id,
            suites = selection.len(),
            environment = request.environment.as_str(),
            parallel = request.parallel,
            "starting run"
        );

        let ctx = SuiteContext {
            run_id,
            environment: request.environment,
            window: TimeWindow::ending_at(now, request.window_hours),
            now,
            judge: Arc::clone(&self.judge),
            data: Arc::clone(&self.data),
            baselines: Arc::clone(&self.baselines),
            policies: self.policies.clone(),
        };

        let wall_start = Instant::now();
        let concurrency = if request.parallel {
            self.config.max_concurrent_suites.max(1)
        } else {
            1
        };
        let suite_budget = std::time::Duration::from_secs(self.config.suite_timeout_secs);

        let outcomes: Vec<(Suite, SuiteOutcome)> = stream::iter(selection.iter().copied())
            .map(|suite| {
                let ctx = ctx.clone();
                let cancel = Arc::clone(&self.cancel);
                async move {
                    if cancel.load(Ordering::SeqCst) {
                        return (suite, SuiteOutcome::NotDispatched);
                    }
                    let started = Instant::now();
                    let outcome = match timeout(suite_budget, adapter_for(suite).run(&ctx)).await {
                        Ok(Ok(results)) => {
                            let elapsed = u64::try_from(started.elapsed().as_millis())
                                .unwrap_or(u64::MAX);
                            // Share the suite's elapsed across its
                            // results; a check that recorded its own
                            // duration keeps it.
                            let share =
                                elapsed / u64::try_from(results.len().max(1)).unwrap_or(1);
                            let stamped = results
                                .into_iter()
                                .map(|r| {
                                    if r.duration_ms == 0 {
                                        r.with_duration_ms(share)
                                    } else {
                                        r
                                    }
                                })
                                .collect();
                            SuiteOutcome::Completed(stamped)
                        }
                        Ok(Err(fault)) => {
                            warn!(%run_id, suite = %suite, "suite faulted: {fault}");
                            SuiteOutcome::Errored(TestResult::suite_error(
                                run_id,
                                suite,
                                fault.to_string(),
                                ctx.now,
                            ))
                        }
                        Err(_) => {
                            warn!(%run_id, suite = %suite, "suite timed out");
                            SuiteOutcome::Errored(TestResult::suite_error(
                                run_id,
                                suite,
                                format!("suite exceeded {}s budget", suite_budget.as_secs()),
                                ctx.now,
                            ))
                        }
                    };
                    (suite, outcome)
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let mut all_results = Vec::new();
        let mut suites_completed = 0usize;
        let mut cancelled = false;

        for (suite, outcome) in outcomes {
            match outcome {
                SuiteOutcome::Completed(results) => {
                    suites_completed += 1;
                    self.results
                        .append_all(&results)
                        .await
                        .with_context(|| format!("persisting {suite} results"))?;
                    all_results.extend(results);
                }
                SuiteOutcome::Errored(result) => {
                    self.results
                        .append(&result)
                        .await
                        .with_context(|| format!("persisting {suite} error result"))?;
                    all_results.push(result);
                }
                SuiteOutcome::NotDispatched => cancelled = true,
            }
        }

        let status = if cancelled {
            RunStatus::Cancelled
        } else {
            RunStatus::Completed
        };

        let ended_at = now
            + chrono::Duration::milliseconds(
                i64::try_from(wall_start.elapsed().as_millis()).unwrap_or(i64::MAX),
            );
        let mut summary = RunSummary::from_results(
            run_id,
            status,
            request.environment,
            now,
            ended_at,
            selection.len(),
            suites_completed,
            &all_results,
        );
        summary.total_duration_ms =
            u64::try_from(wall_start.elapsed().as_millis()).unwrap_or(u64::MAX);
        summary.narrative_summary = self.narrative(&summary).await;

        self.summaries
            .insert(&summary)
            .await
            .context("persisting run summary")?;

        info!(
            %run_id,
            status = status.as_str(),
            total = summary.total_tests,
            passed = summary.passed,
            failed = summary.failed,
            errored = summary.errored,
            "run finished"
        );

        Ok(summary)
    }

    /// Narrative rollup from the judge. Best-effort only; a judge
    /// outage never fails the run.
    async fn narrative(&self, summary: &RunSummary) -> Option<String> {
        let prompt = format!(
            "Summarize this test run for an operations audience in two sentences. \
             {} tests: {} passed, {} failed, {} warnings, {} skipped, {} errors.",
            summary.total_tests,
            summary.passed,
            summary.failed,
            summary.warned,
            summary.skipped,
            summary.errored,
        );
        match self.judge.generate_text(&prompt).await {
            Ok(text) => Some(text),
            Err(err) => {
                warn!("narrative generation unavailable: {err}");
                None
            }
        }
    }
}
