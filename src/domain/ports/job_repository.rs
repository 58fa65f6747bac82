use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::models::{JobStatus, ScheduledJob};
use crate::domain::ports::errors::DatabaseError;

/// Repository port for scheduled jobs.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn insert(&self, job: &ScheduledJob) -> Result<(), DatabaseError>;

    async fn get(&self, job_id: Uuid) -> Result<Option<ScheduledJob>, DatabaseError>;

    async fn get_by_name(&self, name: &str) -> Result<Option<ScheduledJob>, DatabaseError>;

    async fn list(&self) -> Result<Vec<ScheduledJob>, DatabaseError>;

    /// Active jobs with `next_run_at <= now`
    async fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<ScheduledJob>, DatabaseError>;

    /// Persist post-run bookkeeping (last_run_at, next_run_at, counters)
    async fn update_after_run(&self, job: &ScheduledJob) -> Result<(), DatabaseError>;

    async fn set_status(&self, job_id: Uuid, status: JobStatus) -> Result<(), DatabaseError>;

    async fn delete(&self, job_id: Uuid) -> Result<(), DatabaseError>;

    /// Acquire the per-job lease so only one driver triggers a given
    /// job. Returns true when this holder now owns the lease. A lease
    /// whose `lease_until` has passed is free to take over.
    async fn try_acquire_lease(
        &self,
        job_id: Uuid,
        holder: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<bool, DatabaseError>;

    /// Release a lease held by this holder
    async fn release_lease(&self, job_id: Uuid, holder: &str) -> Result<(), DatabaseError>;
}
