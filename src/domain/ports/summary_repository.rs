use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::RunSummary;
use crate::domain::ports::errors::DatabaseError;

/// Repository port for run summaries.
///
/// One summary per run_id, inserted once at the end of orchestration
/// and never mutated.
#[async_trait]
pub trait SummaryRepository: Send + Sync {
    async fn insert(&self, summary: &RunSummary) -> Result<(), DatabaseError>;

    async fn get(&self, run_id: Uuid) -> Result<Option<RunSummary>, DatabaseError>;

    /// Most recent summaries, newest first
    async fn list_recent(&self, limit: i64) -> Result<Vec<RunSummary>, DatabaseError>;
}
