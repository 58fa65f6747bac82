use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::models::Alert;
use crate::domain::ports::errors::DatabaseError;

/// Repository port for alerts.
#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Insert unless an alert with the same dedupe key already exists.
    /// Returns true when a new alert was recorded. This is what makes
    /// alert generation idempotent per (run, rule).
    async fn insert_if_absent(&self, alert: &Alert) -> Result<bool, DatabaseError>;

    async fn get(&self, alert_id: Uuid) -> Result<Option<Alert>, DatabaseError>;

    /// All alerts, optionally only unresolved, newest first
    async fn list(&self, unresolved_only: bool, limit: i64) -> Result<Vec<Alert>, DatabaseError>;

    async fn acknowledge(&self, alert_id: Uuid) -> Result<(), DatabaseError>;

    async fn resolve(&self, alert_id: Uuid, at: DateTime<Utc>) -> Result<(), DatabaseError>;

    /// Retention sweep: delete resolved alerts whose resolution is
    /// older than the cutoff. Unresolved alerts are never purged.
    async fn purge_resolved_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DatabaseError>;
}
