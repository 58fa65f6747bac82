//! SQLite implementation of the baseline registry.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::adapters::sqlite::parse_datetime;
use crate::domain::models::{BaselineEntry, MetricDirection};
use crate::domain::ports::baseline_repository::BaselineRepository;
use crate::domain::ports::errors::DatabaseError;

pub struct SqliteBaselineRepository {
    pool: SqlitePool,
}

impl SqliteBaselineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<BaselineEntry, DatabaseError> {
        let direction_str: String = row.get("direction");
        Ok(BaselineEntry {
            test_name: row.get("test_name"),
            metric_name: row.get("metric_name"),
            baseline_value: row.get("baseline_value"),
            tolerance_pct: row.get("tolerance_pct"),
            direction: MetricDirection::from_str(&direction_str).ok_or_else(|| {
                DatabaseError::ParseError(format!("unknown direction: {direction_str}"))
            })?,
            updated_at: parse_datetime(&row.get::<String, _>("updated_at"))?,
        })
    }
}

#[async_trait]
impl BaselineRepository for SqliteBaselineRepository {
    async fn upsert(&self, entry: &BaselineEntry) -> Result<(), DatabaseError> {
        let updated_at = entry.updated_at.to_rfc3339();

        // Single-statement replacement; readers never see a partial entry
        sqlx::query(
            "INSERT INTO baselines
             (test_name, metric_name, baseline_value, tolerance_pct, direction, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (test_name, metric_name) DO UPDATE SET
               baseline_value = excluded.baseline_value,
               tolerance_pct = excluded.tolerance_pct,
               direction = excluded.direction,
               updated_at = excluded.updated_at",
        )
        .bind(&entry.test_name)
        .bind(&entry.metric_name)
        .bind(entry.baseline_value)
        .bind(entry.tolerance_pct)
        .bind(entry.direction.as_str())
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(
        &self,
        test_name: &str,
        metric_name: &str,
    ) -> Result<Option<BaselineEntry>, DatabaseError> {
        let row = sqlx::query("SELECT * FROM baselines WHERE test_name = ?1 AND metric_name = ?2")
            .bind(test_name)
            .bind(metric_name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_entry).transpose()
    }

    async fn list(&self) -> Result<Vec<BaselineEntry>, DatabaseError> {
        let rows = sqlx::query("SELECT * FROM baselines ORDER BY test_name, metric_name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_entry).collect()
    }
}
