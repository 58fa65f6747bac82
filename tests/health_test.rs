//! Health engine tests over stored results.

mod common;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use common::migrated_pool;
use vigil::adapters::sqlite::SqliteResultRepository;
use vigil::domain::models::{
    HealthGrade, Suite, TestResult, TestStatus, TimeWindow, TrendDirection,
};
use vigil::domain::ports::ResultRepository;
use vigil::services::health::HealthEngine;

fn result(
    suite: Suite,
    status: TestStatus,
    score: f64,
    recorded_at: DateTime<Utc>,
) -> TestResult {
    TestResult::evaluated(Uuid::new_v4(), suite, "t", status, score, recorded_at)
}

#[tokio::test]
async fn clean_window_grades_excellent() {
    let pool = migrated_pool().await;
    let results = Arc::new(SqliteResultRepository::new(pool));
    let now = Utc::now();
    let in_window = now - Duration::hours(2);

    for _ in 0..50 {
        results
            .append(&result(Suite::Semantic, TestStatus::Passed, 0.95, in_window))
            .await
            .unwrap();
    }

    let engine = HealthEngine::new(results);
    let report = engine
        .health_of(TimeWindow::ending_at(now, 24))
        .await
        .unwrap();

    assert_eq!(report.grade, HealthGrade::Excellent);
    assert_eq!(report.total_tests, 50);
    assert!((report.success_rate.unwrap() - 1.0).abs() < 1e-9);
    assert!(report.violation_rate.abs() < 1e-9);
}

#[tokio::test]
async fn failures_push_the_grade_down() {
    let pool = migrated_pool().await;
    let results = Arc::new(SqliteResultRepository::new(pool));
    let now = Utc::now();
    let in_window = now - Duration::hours(2);

    // 3 failures over 20 evaluated: 15%, needs improvement
    for _ in 0..17 {
        results
            .append(&result(Suite::Semantic, TestStatus::Passed, 0.9, in_window))
            .await
            .unwrap();
    }
    for _ in 0..3 {
        results
            .append(&result(Suite::Semantic, TestStatus::Failed, 0.3, in_window))
            .await
            .unwrap();
    }

    let engine = HealthEngine::new(results);
    let report = engine
        .health_of(TimeWindow::ending_at(now, 24))
        .await
        .unwrap();

    assert_eq!(report.grade, HealthGrade::NeedsImprovement);
    assert!((report.violation_rate - 0.15).abs() < 1e-9);
}

#[tokio::test]
async fn empty_window_reports_no_success_rate() {
    let pool = migrated_pool().await;
    let results = Arc::new(SqliteResultRepository::new(pool));

    let engine = HealthEngine::new(results);
    let report = engine
        .health_of(TimeWindow::ending_at(Utc::now(), 24))
        .await
        .unwrap();

    assert_eq!(report.total_tests, 0);
    assert!(report.success_rate.is_none());
    assert!(report.suite_trends.is_empty());
}

#[tokio::test]
async fn repeated_aggregation_over_the_same_window_is_identical() {
    let pool = migrated_pool().await;
    let results = Arc::new(SqliteResultRepository::new(pool));
    let now = Utc::now();
    let current = now - Duration::hours(2);
    let prior = now - Duration::hours(30);

    for i in 0..12 {
        let status = if i % 4 == 0 {
            TestStatus::Failed
        } else {
            TestStatus::Passed
        };
        results
            .append(&result(Suite::Semantic, status, 0.7, current))
            .await
            .unwrap();
        results
            .append(&result(Suite::Realtime, TestStatus::Passed, 0.8, prior))
            .await
            .unwrap();
    }

    // Aggregation is a pure function of the stored window: asking
    // twice gives the same report
    let engine = HealthEngine::new(results);
    let window = TimeWindow::ending_at(now, 24);
    let first = engine.health_of(window).await.unwrap();
    let second = engine.health_of(window).await.unwrap();

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[tokio::test]
async fn trend_compares_against_the_preceding_window() {
    let pool = migrated_pool().await;
    let results = Arc::new(SqliteResultRepository::new(pool));
    let now = Utc::now();
    let current = now - Duration::hours(2);
    let prior = now - Duration::hours(30);

    // Prior window averaged 0.60, current 0.90: improving
    for _ in 0..10 {
        results
            .append(&result(Suite::Semantic, TestStatus::Warning, 0.60, prior))
            .await
            .unwrap();
        results
            .append(&result(Suite::Semantic, TestStatus::Passed, 0.90, current))
            .await
            .unwrap();
    }

    let engine = HealthEngine::new(results);
    let report = engine
        .health_of(TimeWindow::ending_at(now, 24))
        .await
        .unwrap();

    let trend = report.suite_trends.get("semantic").unwrap();
    assert_eq!(trend.direction, TrendDirection::Improving);
    assert!((trend.current_avg_score - 0.90).abs() < 1e-9);
    assert!((trend.prior_avg_score.unwrap() - 0.60).abs() < 1e-9);
}
