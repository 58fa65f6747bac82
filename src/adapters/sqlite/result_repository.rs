//! SQLite implementation of the append-only result store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::models::{Suite, SuiteDetail, TestResult, TestSeverity, TestStatus, TimeWindow};
use crate::domain::ports::errors::DatabaseError;
use crate::domain::ports::result_repository::{ResultFilters, ResultRepository};

pub struct SqliteResultRepository {
    pool: SqlitePool,
}

impl SqliteResultRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_result(row: &sqlx::sqlite::SqliteRow) -> Result<TestResult, DatabaseError> {
        let suite_str: String = row.get("suite");
        let status_str: String = row.get("status");
        let severity_str: String = row.get("severity");
        let detail: Option<SuiteDetail> = row
            .get::<Option<String>, _>("detail")
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok());

        Ok(TestResult {
            result_id: parse_uuid(&row.get::<String, _>("result_id"))?,
            run_id: parse_uuid(&row.get::<String, _>("run_id"))?,
            suite: Suite::from_str(&suite_str)
                .ok_or_else(|| DatabaseError::ParseError(format!("unknown suite: {suite_str}")))?,
            test_name: row.get("test_name"),
            status: TestStatus::from_str(&status_str).ok_or_else(|| {
                DatabaseError::ParseError(format!("unknown status: {status_str}"))
            })?,
            severity: TestSeverity::from_str(&severity_str).unwrap_or_default(),
            score: row.get("score"),
            duration_ms: u64::try_from(row.get::<i64, _>("duration_ms")).unwrap_or(0),
            detail,
            error_message: row.get("error_message"),
            recorded_at: parse_datetime(&row.get::<String, _>("recorded_at"))?,
        })
    }
}

#[async_trait]
impl ResultRepository for SqliteResultRepository {
    async fn append(&self, result: &TestResult) -> Result<(), DatabaseError> {
        let result_id = result.result_id.to_string();
        let run_id = result.run_id.to_string();
        let suite = result.suite.as_str();
        let status = result.status.as_str();
        let severity = result.severity.as_str();
        let detail = result
            .detail
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let duration_ms = i64::try_from(result.duration_ms).unwrap_or(i64::MAX);
        let recorded_at = result.recorded_at.to_rfc3339();

        sqlx::query(
            "INSERT INTO test_results
             (result_id, run_id, suite, test_name, status, severity, score,
              duration_ms, detail, error_message, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&result_id)
        .bind(&run_id)
        .bind(suite)
        .bind(&result.test_name)
        .bind(status)
        .bind(severity)
        .bind(result.score)
        .bind(duration_ms)
        .bind(&detail)
        .bind(&result.error_message)
        .bind(&recorded_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn append_all(&self, results: &[TestResult]) -> Result<(), DatabaseError> {
        for result in results {
            self.append(result).await?;
        }
        Ok(())
    }

    async fn list_by_run(&self, run_id: Uuid) -> Result<Vec<TestResult>, DatabaseError> {
        let run_id = run_id.to_string();
        let rows = sqlx::query(
            "SELECT * FROM test_results WHERE run_id = ?1 ORDER BY recorded_at, result_id",
        )
        .bind(&run_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_result).collect()
    }

    async fn list_in_window(&self, window: TimeWindow) -> Result<Vec<TestResult>, DatabaseError> {
        let start = window.start.to_rfc3339();
        let end = window.end.to_rfc3339();
        let rows = sqlx::query(
            "SELECT * FROM test_results
             WHERE recorded_at >= ?1 AND recorded_at < ?2
             ORDER BY recorded_at, result_id",
        )
        .bind(&start)
        .bind(&end)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_result).collect()
    }

    async fn list(&self, filters: ResultFilters) -> Result<Vec<TestResult>, DatabaseError> {
        let mut sql = String::from("SELECT * FROM test_results WHERE 1=1");
        if filters.run_id.is_some() {
            sql.push_str(" AND run_id = ?");
        }
        if filters.suite.is_some() {
            sql.push_str(" AND suite = ?");
        }
        if filters.status.is_some() {
            sql.push_str(" AND status = ?");
        }
        sql.push_str(" ORDER BY recorded_at DESC");
        sql.push_str(" LIMIT ?");

        let mut query = sqlx::query(&sql);
        if let Some(run_id) = filters.run_id {
            query = query.bind(run_id.to_string());
        }
        if let Some(suite) = filters.suite {
            query = query.bind(suite.as_str());
        }
        if let Some(status) = filters.status {
            query = query.bind(status.as_str());
        }
        query = query.bind(filters.limit.unwrap_or(100));

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_result).collect()
    }

    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DatabaseError> {
        let cutoff = cutoff.to_rfc3339();
        let outcome = sqlx::query("DELETE FROM test_results WHERE recorded_at < ?1")
            .bind(&cutoff)
            .execute(&self.pool)
            .await?;
        Ok(outcome.rows_affected())
    }
}
