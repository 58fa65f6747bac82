use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::models::{Suite, TestResult, TestStatus, TimeWindow};
use crate::domain::ports::errors::DatabaseError;

/// Filters for listing results.
#[derive(Default, Debug, Clone)]
pub struct ResultFilters {
    pub run_id: Option<Uuid>,
    pub suite: Option<Suite>,
    pub status: Option<TestStatus>,
    pub limit: Option<i64>,
}

/// Repository port for the append-only result store.
///
/// Writes from different suites are concurrent-safe: every append is a
/// new row, no shared mutable state. There is deliberately no update
/// method.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Append one result
    async fn append(&self, result: &TestResult) -> Result<(), DatabaseError>;

    /// Append a batch of results from one suite
    async fn append_all(&self, results: &[TestResult]) -> Result<(), DatabaseError>;

    /// All results tagged with a run
    async fn list_by_run(&self, run_id: Uuid) -> Result<Vec<TestResult>, DatabaseError>;

    /// Results recorded inside a time window
    async fn list_in_window(&self, window: TimeWindow) -> Result<Vec<TestResult>, DatabaseError>;

    /// Filtered listing for the CLI/API reader surface
    async fn list(&self, filters: ResultFilters) -> Result<Vec<TestResult>, DatabaseError>;

    /// Retention sweep: delete results recorded before the cutoff.
    /// Returns the number purged.
    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DatabaseError>;
}
