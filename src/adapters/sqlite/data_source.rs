//! SQLite-backed read-only view of the platform's business stores.
//!
//! Suitable for deployments where the warehouse tables are mirrored
//! locally; production deployments can swap in another `DataSource`
//! implementation without touching the suites.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::adapters::sqlite::parse_datetime;
use crate::domain::models::{InsightRecord, InteractionRecord, KnowledgeRecord, TimeWindow};
use crate::domain::ports::data_source::DataSource;
use crate::domain::ports::errors::AdapterFault;

pub struct SqliteDataSource {
    pool: SqlitePool,
}

impl SqliteDataSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn source_err(e: sqlx::Error) -> AdapterFault {
    AdapterFault::DataSourceUnavailable(e.to_string())
}

fn malformed(e: impl std::fmt::Display) -> AdapterFault {
    AdapterFault::MalformedData(e.to_string())
}

#[async_trait]
impl DataSource for SqliteDataSource {
    #[allow(clippy::cast_possible_wrap)]
    async fn knowledge_records(
        &self,
        window: TimeWindow,
        limit: usize,
    ) -> Result<Vec<KnowledgeRecord>, AdapterFault> {
        let start = window.start.to_rfc3339();
        let end = window.end.to_rfc3339();
        let rows = sqlx::query(
            "SELECT * FROM knowledge_records
             WHERE created_at >= ?1 AND created_at < ?2
             ORDER BY created_at DESC LIMIT ?3",
        )
        .bind(&start)
        .bind(&end)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(source_err)?;

        rows.iter()
            .map(|row| {
                Ok(KnowledgeRecord {
                    id: row.get("id"),
                    content: row.get("content"),
                    source_query: row.get("source_query"),
                    attachment_ref: row.get("attachment_ref"),
                    attachment_caption: row.get("attachment_caption"),
                    department: row.get("department"),
                    confidence: row.get("confidence"),
                    created_at: parse_datetime(&row.get::<String, _>("created_at"))
                        .map_err(malformed)?,
                })
            })
            .collect()
    }

    #[allow(clippy::cast_possible_wrap)]
    async fn insight_records(
        &self,
        window: TimeWindow,
        limit: usize,
    ) -> Result<Vec<InsightRecord>, AdapterFault> {
        let start = window.start.to_rfc3339();
        let end = window.end.to_rfc3339();
        let rows = sqlx::query(
            "SELECT * FROM insight_records
             WHERE created_at >= ?1 AND created_at < ?2
             ORDER BY created_at DESC LIMIT ?3",
        )
        .bind(&start)
        .bind(&end)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(source_err)?;

        rows.iter()
            .map(|row| {
                Ok(InsightRecord {
                    id: row.get("id"),
                    knowledge_id: row.get("knowledge_id"),
                    content: row.get("content"),
                    confidence: row.get("confidence"),
                    department: row.get("department"),
                    target_role: row.get("target_role"),
                    created_at: parse_datetime(&row.get::<String, _>("created_at"))
                        .map_err(malformed)?,
                })
            })
            .collect()
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    async fn interaction_records(
        &self,
        window: TimeWindow,
        limit: usize,
    ) -> Result<Vec<InteractionRecord>, AdapterFault> {
        let start = window.start.to_rfc3339();
        let end = window.end.to_rfc3339();
        let rows = sqlx::query(
            "SELECT * FROM interaction_records
             WHERE created_at >= ?1 AND created_at < ?2
             ORDER BY created_at DESC LIMIT ?3",
        )
        .bind(&start)
        .bind(&end)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(source_err)?;

        rows.iter()
            .map(|row| {
                Ok(InteractionRecord {
                    id: row.get("id"),
                    insight_id: row.get("insight_id"),
                    user_role: row.get("user_role"),
                    department: row.get("department"),
                    region: row.get("region"),
                    seniority: row.get("seniority"),
                    gender: row.get("gender"),
                    positive_outcome: row.get::<i64, _>("positive_outcome") != 0,
                    relevance_score: row.get("relevance_score"),
                    feedback_score: row.get("feedback_score"),
                    latency_ms: row
                        .get::<Option<i64>, _>("latency_ms")
                        .map(|v| v.max(0) as u64),
                    created_at: parse_datetime(&row.get::<String, _>("created_at"))
                        .map_err(malformed)?,
                })
            })
            .collect()
    }
}
