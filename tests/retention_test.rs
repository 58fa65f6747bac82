//! Retention sweep tests.

mod common;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use common::migrated_pool;
use vigil::adapters::sqlite::{SqliteAlertRepository, SqliteResultRepository};
use vigil::domain::models::{
    Alert, AlertCategory, AlertSeverity, RetentionConfig, Suite, TestResult, TestStatus,
};
use vigil::domain::ports::{AlertRepository, ResultFilters, ResultRepository};
use vigil::services::retention::RetentionSweeper;

fn result_at(recorded_at: DateTime<Utc>) -> TestResult {
    TestResult::evaluated(
        Uuid::new_v4(),
        Suite::Semantic,
        "t",
        TestStatus::Passed,
        0.9,
        recorded_at,
    )
}

fn alert_at(created_at: DateTime<Utc>) -> Alert {
    Alert::new(
        Uuid::new_v4().to_string(),
        None,
        AlertCategory::Health,
        AlertSeverity::Low,
        "stale",
        json!({}),
        created_at,
    )
}

#[tokio::test]
async fn sweep_purges_aged_results_and_keeps_recent_ones() {
    let pool = migrated_pool().await;
    let results = Arc::new(SqliteResultRepository::new(pool.clone()));
    let alerts = Arc::new(SqliteAlertRepository::new(pool));
    let now = Utc::now();

    results.append(&result_at(now - Duration::days(100))).await.unwrap();
    results.append(&result_at(now - Duration::days(10))).await.unwrap();

    let sweeper = RetentionSweeper::new(results.clone(), alerts, RetentionConfig::default());
    let outcome = sweeper.sweep(now).await.unwrap();

    assert_eq!(outcome.results_purged, 1);
    let remaining = results.list(ResultFilters::default()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert!(remaining[0].recorded_at > now - Duration::days(90));
}

#[tokio::test]
async fn sweep_never_touches_unresolved_alerts() {
    let pool = migrated_pool().await;
    let results = Arc::new(SqliteResultRepository::new(pool.clone()));
    let alerts = Arc::new(SqliteAlertRepository::new(pool));
    let now = Utc::now();

    // Both alerts are old; only the resolved one may go
    let resolved = alert_at(now - Duration::days(120));
    let unresolved = alert_at(now - Duration::days(120));
    alerts.insert_if_absent(&resolved).await.unwrap();
    alerts.insert_if_absent(&unresolved).await.unwrap();
    alerts
        .resolve(resolved.alert_id, now - Duration::days(60))
        .await
        .unwrap();

    let sweeper = RetentionSweeper::new(results, alerts.clone(), RetentionConfig::default());
    let outcome = sweeper.sweep(now).await.unwrap();

    assert_eq!(outcome.alerts_purged, 1);
    let remaining = alerts.list(false, 10).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].alert_id, unresolved.alert_id);
    assert!(!remaining[0].resolved);
}
