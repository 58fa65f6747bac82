//! SQLite implementation of the alert store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_optional_uuid, parse_uuid};
use crate::domain::models::{Alert, AlertCategory, AlertSeverity};
use crate::domain::ports::alert_repository::AlertRepository;
use crate::domain::ports::errors::DatabaseError;

pub struct SqliteAlertRepository {
    pool: SqlitePool,
}

impl SqliteAlertRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_alert(row: &sqlx::sqlite::SqliteRow) -> Result<Alert, DatabaseError> {
        let category_str: String = row.get("category");
        let severity_str: String = row.get("severity");
        let context_str: String = row.get("structured_context");

        Ok(Alert {
            alert_id: parse_uuid(&row.get::<String, _>("alert_id"))?,
            dedupe_key: row.get("dedupe_key"),
            source_run_id: parse_optional_uuid(row.get::<Option<String>, _>("source_run_id"))?,
            category: AlertCategory::from_str(&category_str).ok_or_else(|| {
                DatabaseError::ParseError(format!("unknown category: {category_str}"))
            })?,
            severity: AlertSeverity::from_str(&severity_str).ok_or_else(|| {
                DatabaseError::ParseError(format!("unknown severity: {severity_str}"))
            })?,
            message: row.get("message"),
            structured_context: serde_json::from_str(&context_str)?,
            acknowledged: row.get::<i64, _>("acknowledged") != 0,
            resolved: row.get::<i64, _>("resolved") != 0,
            created_at: parse_datetime(&row.get::<String, _>("created_at"))?,
            resolved_at: row
                .get::<Option<String>, _>("resolved_at")
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
        })
    }
}

#[async_trait]
impl AlertRepository for SqliteAlertRepository {
    async fn insert_if_absent(&self, alert: &Alert) -> Result<bool, DatabaseError> {
        let alert_id = alert.alert_id.to_string();
        let source_run_id = alert.source_run_id.map(|id| id.to_string());
        let context = serde_json::to_string(&alert.structured_context)?;
        let created_at = alert.created_at.to_rfc3339();

        // Unique index on dedupe_key makes re-evaluation idempotent
        let outcome = sqlx::query(
            "INSERT OR IGNORE INTO alerts
             (alert_id, dedupe_key, source_run_id, category, severity,
              message, structured_context, acknowledged, resolved, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, 0, ?8)",
        )
        .bind(&alert_id)
        .bind(&alert.dedupe_key)
        .bind(&source_run_id)
        .bind(alert.category.as_str())
        .bind(alert.severity.as_str())
        .bind(&alert.message)
        .bind(&context)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        Ok(outcome.rows_affected() > 0)
    }

    async fn get(&self, alert_id: Uuid) -> Result<Option<Alert>, DatabaseError> {
        let alert_id = alert_id.to_string();
        let row = sqlx::query("SELECT * FROM alerts WHERE alert_id = ?1")
            .bind(&alert_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_alert).transpose()
    }

    async fn list(&self, unresolved_only: bool, limit: i64) -> Result<Vec<Alert>, DatabaseError> {
        let sql = if unresolved_only {
            "SELECT * FROM alerts WHERE resolved = 0 ORDER BY created_at DESC LIMIT ?1"
        } else {
            "SELECT * FROM alerts ORDER BY created_at DESC LIMIT ?1"
        };
        let rows = sqlx::query(sql).bind(limit).fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_alert).collect()
    }

    async fn acknowledge(&self, alert_id: Uuid) -> Result<(), DatabaseError> {
        let id = alert_id.to_string();
        let outcome = sqlx::query("UPDATE alerts SET acknowledged = 1 WHERE alert_id = ?1")
            .bind(&id)
            .execute(&self.pool)
            .await?;
        if outcome.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(alert_id));
        }
        Ok(())
    }

    async fn resolve(&self, alert_id: Uuid, at: DateTime<Utc>) -> Result<(), DatabaseError> {
        let id = alert_id.to_string();
        let at = at.to_rfc3339();
        let outcome = sqlx::query(
            "UPDATE alerts SET resolved = 1, acknowledged = 1, resolved_at = ?2
             WHERE alert_id = ?1",
        )
        .bind(&id)
        .bind(&at)
        .execute(&self.pool)
        .await?;
        if outcome.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(alert_id));
        }
        Ok(())
    }

    async fn purge_resolved_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DatabaseError> {
        let cutoff = cutoff.to_rfc3339();
        let outcome = sqlx::query(
            "DELETE FROM alerts WHERE resolved = 1 AND resolved_at IS NOT NULL AND resolved_at < ?1",
        )
        .bind(&cutoff)
        .execute(&self.pool)
        .await?;
        Ok(outcome.rows_affected())
    }
}
