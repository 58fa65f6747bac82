//! SQLite implementation of the run summary store.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::models::{Environment, RunStatus, RunSummary};
use crate::domain::ports::errors::DatabaseError;
use crate::domain::ports::summary_repository::SummaryRepository;

pub struct SqliteSummaryRepository {
    pool: SqlitePool,
}

impl SqliteSummaryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[allow(clippy::cast_sign_loss)]
    fn row_to_summary(row: &sqlx::sqlite::SqliteRow) -> Result<RunSummary, DatabaseError> {
        let status_str: String = row.get("status");
        let env_str: String = row.get("environment");

        Ok(RunSummary {
            run_id: parse_uuid(&row.get::<String, _>("run_id"))?,
            status: RunStatus::from_str(&status_str).ok_or_else(|| {
                DatabaseError::ParseError(format!("unknown run status: {status_str}"))
            })?,
            environment: Environment::from_str(&env_str).ok_or_else(|| {
                DatabaseError::ParseError(format!("unknown environment: {env_str}"))
            })?,
            started_at: parse_datetime(&row.get::<String, _>("started_at"))?,
            ended_at: parse_datetime(&row.get::<String, _>("ended_at"))?,
            suites_requested: row.get::<i64, _>("suites_requested") as usize,
            suites_completed: row.get::<i64, _>("suites_completed") as usize,
            total_tests: row.get::<i64, _>("total_tests") as usize,
            passed: row.get::<i64, _>("passed") as usize,
            failed: row.get::<i64, _>("failed") as usize,
            warned: row.get::<i64, _>("warned") as usize,
            skipped: row.get::<i64, _>("skipped") as usize,
            errored: row.get::<i64, _>("errored") as usize,
            success_rate: row.get("success_rate"),
            total_duration_ms: row.get::<i64, _>("total_duration_ms") as u64,
            narrative_summary: row.get("narrative_summary"),
        })
    }
}

#[async_trait]
impl SummaryRepository for SqliteSummaryRepository {
    #[allow(clippy::cast_possible_wrap)]
    async fn insert(&self, summary: &RunSummary) -> Result<(), DatabaseError> {
        let run_id = summary.run_id.to_string();
        let started_at = summary.started_at.to_rfc3339();
        let ended_at = summary.ended_at.to_rfc3339();

        sqlx::query(
            "INSERT INTO run_summaries
             (run_id, status, environment, started_at, ended_at,
              suites_requested, suites_completed, total_tests,
              passed, failed, warned, skipped, errored,
              success_rate, total_duration_ms, narrative_summary)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        )
        .bind(&run_id)
        .bind(summary.status.as_str())
        .bind(summary.environment.as_str())
        .bind(&started_at)
        .bind(&ended_at)
        .bind(summary.suites_requested as i64)
        .bind(summary.suites_completed as i64)
        .bind(summary.total_tests as i64)
        .bind(summary.passed as i64)
        .bind(summary.failed as i64)
        .bind(summary.warned as i64)
        .bind(summary.skipped as i64)
        .bind(summary.errored as i64)
        .bind(summary.success_rate)
        .bind(summary.total_duration_ms as i64)
        .bind(&summary.narrative_summary)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, run_id: Uuid) -> Result<Option<RunSummary>, DatabaseError> {
        let run_id = run_id.to_string();
        let row = sqlx::query("SELECT * FROM run_summaries WHERE run_id = ?1")
            .bind(&run_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_summary).transpose()
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<RunSummary>, DatabaseError> {
        let rows = sqlx::query("SELECT * FROM run_summaries ORDER BY started_at DESC LIMIT ?1")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_summary).collect()
    }
}
