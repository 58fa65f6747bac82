use async_trait::async_trait;

use crate::domain::models::BaselineEntry;
use crate::domain::ports::errors::DatabaseError;

/// Repository port for the baseline registry.
///
/// Read-mostly during runs; writes are rare, serialized administrative
/// replacements. Readers always see a complete entry, never a
/// half-written one (upsert is a single statement).
#[async_trait]
pub trait BaselineRepository: Send + Sync {
    /// Full replacement of the (test, metric) entry
    async fn upsert(&self, entry: &BaselineEntry) -> Result<(), DatabaseError>;

    async fn get(
        &self,
        test_name: &str,
        metric_name: &str,
    ) -> Result<Option<BaselineEntry>, DatabaseError>;

    async fn list(&self) -> Result<Vec<BaselineEntry>, DatabaseError>;
}
