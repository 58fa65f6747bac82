//! SQLite implementation of the scheduled job store.
//!
//! The lease columns make `tick` safe against concurrent drivers: an
//! atomic conditional UPDATE is the lock, no read-check-write window.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::models::{JobFrequency, JobParameters, JobStatus, ScheduledJob};
use crate::domain::ports::errors::DatabaseError;
use crate::domain::ports::job_repository::JobRepository;

pub struct SqliteJobRepository {
    pool: SqlitePool,
}

impl SqliteJobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[allow(clippy::cast_sign_loss)]
    fn row_to_job(row: &sqlx::sqlite::SqliteRow) -> Result<ScheduledJob, DatabaseError> {
        let frequency_str: String = row.get("frequency");
        let status_str: String = row.get("status");
        let parameters_str: String = row.get("parameters");
        let anchor_time = row
            .get::<Option<String>, _>("anchor_time")
            .as_deref()
            .map(|s| {
                NaiveTime::parse_from_str(s, "%H:%M:%S")
                    .map_err(|e| DatabaseError::ParseError(format!("bad anchor_time: {e}")))
            })
            .transpose()?;

        Ok(ScheduledJob {
            job_id: parse_uuid(&row.get::<String, _>("job_id"))?,
            name: row.get("name"),
            job_type: row.get("job_type"),
            frequency: JobFrequency::from_str(&frequency_str).ok_or_else(|| {
                DatabaseError::ParseError(format!("unknown frequency: {frequency_str}"))
            })?,
            anchor_time,
            parameters: serde_json::from_str::<JobParameters>(&parameters_str)?,
            status: JobStatus::from_str(&status_str).ok_or_else(|| {
                DatabaseError::ParseError(format!("unknown job status: {status_str}"))
            })?,
            next_run_at: parse_datetime(&row.get::<String, _>("next_run_at"))?,
            last_run_at: row
                .get::<Option<String>, _>("last_run_at")
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            run_count: row.get::<i64, _>("run_count") as u64,
            failure_count: row.get::<i64, _>("failure_count") as u64,
            consecutive_failures: row.get::<i64, _>("consecutive_failures") as u32,
            created_at: parse_datetime(&row.get::<String, _>("created_at"))?,
            updated_at: parse_datetime(&row.get::<String, _>("updated_at"))?,
        })
    }
}

#[async_trait]
impl JobRepository for SqliteJobRepository {
    #[allow(clippy::cast_possible_wrap)]
    async fn insert(&self, job: &ScheduledJob) -> Result<(), DatabaseError> {
        let job_id = job.job_id.to_string();
        let anchor_time = job.anchor_time.map(|t| t.format("%H:%M:%S").to_string());
        let parameters = serde_json::to_string(&job.parameters)?;
        let next_run_at = job.next_run_at.to_rfc3339();
        let last_run_at = job.last_run_at.map(|t| t.to_rfc3339());
        let created_at = job.created_at.to_rfc3339();
        let updated_at = job.updated_at.to_rfc3339();

        let outcome = sqlx::query(
            "INSERT OR IGNORE INTO scheduled_jobs
             (job_id, name, job_type, frequency, anchor_time, parameters, status,
              next_run_at, last_run_at, run_count, failure_count, consecutive_failures,
              created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .bind(&job_id)
        .bind(&job.name)
        .bind(&job.job_type)
        .bind(job.frequency.as_str())
        .bind(&anchor_time)
        .bind(&parameters)
        .bind(job.status.as_str())
        .bind(&next_run_at)
        .bind(&last_run_at)
        .bind(job.run_count as i64)
        .bind(job.failure_count as i64)
        .bind(i64::from(job.consecutive_failures))
        .bind(&created_at)
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;

        if outcome.rows_affected() == 0 {
            return Err(DatabaseError::Duplicate(job.name.clone()));
        }
        Ok(())
    }

    async fn get(&self, job_id: Uuid) -> Result<Option<ScheduledJob>, DatabaseError> {
        let job_id = job_id.to_string();
        let row = sqlx::query("SELECT * FROM scheduled_jobs WHERE job_id = ?1")
            .bind(&job_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_job).transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<ScheduledJob>, DatabaseError> {
        let row = sqlx::query("SELECT * FROM scheduled_jobs WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_job).transpose()
    }

    async fn list(&self) -> Result<Vec<ScheduledJob>, DatabaseError> {
        let rows = sqlx::query("SELECT * FROM scheduled_jobs ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_job).collect()
    }

    async fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<ScheduledJob>, DatabaseError> {
        let now = now.to_rfc3339();
        let rows = sqlx::query(
            "SELECT * FROM scheduled_jobs
             WHERE status = 'active' AND next_run_at <= ?1
             ORDER BY next_run_at",
        )
        .bind(&now)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_job).collect()
    }

    #[allow(clippy::cast_possible_wrap)]
    async fn update_after_run(&self, job: &ScheduledJob) -> Result<(), DatabaseError> {
        let job_id = job.job_id.to_string();
        let next_run_at = job.next_run_at.to_rfc3339();
        let last_run_at = job.last_run_at.map(|t| t.to_rfc3339());
        let updated_at = job.updated_at.to_rfc3339();

        sqlx::query(
            "UPDATE scheduled_jobs SET
               next_run_at = ?2, last_run_at = ?3, run_count = ?4,
               failure_count = ?5, consecutive_failures = ?6,
               status = ?7, updated_at = ?8
             WHERE job_id = ?1",
        )
        .bind(&job_id)
        .bind(&next_run_at)
        .bind(&last_run_at)
        .bind(job.run_count as i64)
        .bind(job.failure_count as i64)
        .bind(i64::from(job.consecutive_failures))
        .bind(job.status.as_str())
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_status(&self, job_id: Uuid, status: JobStatus) -> Result<(), DatabaseError> {
        let id = job_id.to_string();
        let now = Utc::now().to_rfc3339();
        let outcome =
            sqlx::query("UPDATE scheduled_jobs SET status = ?2, updated_at = ?3 WHERE job_id = ?1")
                .bind(&id)
                .bind(status.as_str())
                .bind(&now)
                .execute(&self.pool)
                .await?;
        if outcome.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(job_id));
        }
        Ok(())
    }

    async fn delete(&self, job_id: Uuid) -> Result<(), DatabaseError> {
        let id = job_id.to_string();
        sqlx::query("DELETE FROM scheduled_jobs WHERE job_id = ?1")
            .bind(&id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn try_acquire_lease(
        &self,
        job_id: Uuid,
        holder: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<bool, DatabaseError> {
        let id = job_id.to_string();
        let now_str = now.to_rfc3339();
        let until = (now + ttl).to_rfc3339();

        let outcome = sqlx::query(
            "UPDATE scheduled_jobs SET lease_holder = ?2, lease_until = ?3
             WHERE job_id = ?1
               AND (lease_holder IS NULL OR lease_until IS NULL OR lease_until < ?4
                    OR lease_holder = ?2)",
        )
        .bind(&id)
        .bind(holder)
        .bind(&until)
        .bind(&now_str)
        .execute(&self.pool)
        .await?;

        Ok(outcome.rows_affected() > 0)
    }

    async fn release_lease(&self, job_id: Uuid, holder: &str) -> Result<(), DatabaseError> {
        let id = job_id.to_string();
        sqlx::query(
            "UPDATE scheduled_jobs SET lease_holder = NULL, lease_until = NULL
             WHERE job_id = ?1 AND lease_holder = ?2",
        )
        .bind(&id)
        .bind(holder)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
