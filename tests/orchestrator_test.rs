//! End-to-end orchestration tests over an in-memory store.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};

use common::{
    interaction_record, knowledge_record, migrated_pool, CannedDataSource,
    KnowledgeOutageDataSource,
};
use vigil::adapters::sqlite::{
    SqliteAlertRepository, SqliteBaselineRepository, SqliteResultRepository,
    SqliteSummaryRepository,
};
use vigil::domain::models::{
    Environment, OrchestratorConfig, RunStatus, Suite, SuitePolicies, TestStatus,
};
use vigil::domain::ports::{AlertRepository, DataSource, ResultRepository, StaticJudge};
use vigil::services::alerts::AlertEngine;
use vigil::services::orchestrator::{Orchestrator, RunRequest};

struct Harness {
    results: Arc<SqliteResultRepository>,
    alerts: Arc<SqliteAlertRepository>,
    orchestrator: Orchestrator,
}

async fn harness(data: Arc<dyn DataSource>, judge: StaticJudge) -> Harness {
    let pool = migrated_pool().await;
    let results = Arc::new(SqliteResultRepository::new(pool.clone()));
    let alerts = Arc::new(SqliteAlertRepository::new(pool.clone()));
    let orchestrator = Orchestrator::new(
        results.clone(),
        Arc::new(SqliteSummaryRepository::new(pool.clone())),
        Arc::new(SqliteBaselineRepository::new(pool.clone())),
        data,
        Arc::new(judge),
        OrchestratorConfig::default(),
        SuitePolicies::default(),
    );
    Harness {
        results,
        alerts,
        orchestrator,
    }
}

fn healthy_data() -> CannedDataSource {
    let at = Utc::now() - Duration::hours(1);
    CannedDataSource {
        knowledge: (0..20)
            .map(|i| knowledge_record(&format!("k{i}"), "revenue drivers", at))
            .collect(),
        insights: Vec::new(),
        interactions: (0..30).map(|_| interaction_record(120, at)).collect(),
    }
}

#[tokio::test]
async fn healthy_run_completes_with_no_failures() {
    let h = harness(Arc::new(healthy_data()), StaticJudge::default()).await;

    let request = RunRequest {
        suites: Some(vec![Suite::Semantic, Suite::Realtime, Suite::Personalization]),
        environment: Environment::Staging,
        ..RunRequest::default()
    };
    let summary = h.orchestrator.run(&request, Utc::now()).await.unwrap();

    assert_eq!(summary.status, RunStatus::Completed);
    assert_eq!(summary.suites_requested, 3);
    assert_eq!(summary.suites_completed, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.errored, 0);
    assert!(summary.counts_consistent());
    assert!(summary.success_rate.unwrap() > 0.9);

    let stored = h.results.list_by_run(summary.run_id).await.unwrap();
    assert_eq!(stored.len(), summary.total_tests);
    assert!(stored.iter().all(vigil::TestResult::is_well_formed));
}

#[tokio::test]
async fn faulting_suite_is_isolated_to_one_error_result() {
    let at = Utc::now() - Duration::hours(1);
    let data = KnowledgeOutageDataSource {
        interactions: (0..30).map(|_| interaction_record(150, at)).collect(),
    };
    let h = harness(Arc::new(data), StaticJudge::default()).await;

    let request = RunRequest {
        suites: Some(vec![Suite::Semantic, Suite::Realtime]),
        ..RunRequest::default()
    };
    let summary = h.orchestrator.run(&request, Utc::now()).await.unwrap();

    // The knowledge outage costs semantic exactly one ERROR result;
    // realtime still reports normally.
    assert_eq!(summary.status, RunStatus::Completed);
    assert_eq!(summary.errored, 1);
    assert_eq!(summary.suites_completed, 1);
    assert!(summary.counts_consistent());

    let stored = h.results.list_by_run(summary.run_id).await.unwrap();
    let errors: Vec<_> = stored
        .iter()
        .filter(|r| r.status == TestStatus::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].suite, Suite::Semantic);
    assert!(errors[0].error_message.as_deref().unwrap().contains("unavailable"));
    assert!(stored
        .iter()
        .any(|r| r.suite == Suite::Realtime && r.status == TestStatus::Passed));
}

#[tokio::test]
async fn default_selection_dispatches_all_nine_suites() {
    let h = harness(Arc::new(CannedDataSource::default()), StaticJudge::default()).await;

    let summary = h
        .orchestrator
        .run(&RunRequest::default(), Utc::now())
        .await
        .unwrap();

    // No data anywhere: suites skip or warn, none fail or error
    assert_eq!(summary.suites_requested, 9);
    assert_eq!(summary.suites_completed, 9);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.errored, 0);
    assert!(summary.skipped > 0);
    assert!(summary.counts_consistent());
}

#[tokio::test]
async fn explicit_empty_selection_closes_an_empty_run() {
    let h = harness(Arc::new(healthy_data()), StaticJudge::default()).await;

    let request = RunRequest {
        suites: Some(Vec::new()),
        ..RunRequest::default()
    };
    let summary = h.orchestrator.run(&request, Utc::now()).await.unwrap();

    assert_eq!(summary.status, RunStatus::Completed);
    assert_eq!(summary.suites_requested, 0);
    assert_eq!(summary.suites_completed, 0);
    assert_eq!(summary.total_tests, 0);
    assert!(summary.success_rate.is_none());
    assert!(summary.counts_consistent());

    let stored = h.results.list_by_run(summary.run_id).await.unwrap();
    assert!(stored.is_empty());

    // Nothing evaluated means nothing to alert on
    let raised = AlertEngine::new(h.alerts.clone())
        .evaluate_run(&summary, &stored)
        .await
        .unwrap();
    assert!(raised.is_empty());
}

#[tokio::test]
async fn suite_elapsed_is_shared_across_its_results() {
    let h = harness(Arc::new(healthy_data()), StaticJudge::default()).await;

    // Sequential dispatch: each suite's elapsed is split over its
    // results, so the stored durations never sum past the run total
    let request = RunRequest {
        suites: Some(vec![Suite::Realtime]),
        ..RunRequest::default()
    };
    let summary = h.orchestrator.run(&request, Utc::now()).await.unwrap();

    let stored = h.results.list_by_run(summary.run_id).await.unwrap();
    assert!(stored.len() >= 2, "realtime reports freshness and latency");
    let sum: u64 = stored.iter().map(|r| r.duration_ms).sum();
    assert!(sum <= summary.total_duration_ms);
}

#[tokio::test]
async fn failing_run_raises_alerts_exactly_once() {
    // Judge rejects everything: semantic accuracy lands at zero
    let judge = StaticJudge {
        verdict: false,
        ..StaticJudge::default()
    };
    let h = harness(Arc::new(healthy_data()), judge).await;

    let request = RunRequest {
        suites: Some(vec![Suite::Semantic]),
        ..RunRequest::default()
    };
    let summary = h.orchestrator.run(&request, Utc::now()).await.unwrap();
    assert_eq!(summary.failed, 1);

    let results = h.results.list_by_run(summary.run_id).await.unwrap();
    let engine = AlertEngine::new(h.alerts.clone());

    let first = engine.evaluate_run(&summary, &results).await.unwrap();
    assert!(!first.is_empty(), "a failing run must raise alerts");

    // Re-running the engine over the same run inserts nothing new
    let second = engine.evaluate_run(&summary, &results).await.unwrap();
    assert!(second.is_empty());

    let open = h.alerts.list(true, 50).await.unwrap();
    assert_eq!(open.len(), first.len());
}
