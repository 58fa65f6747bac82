//! Port trait for the business data stores.
//!
//! Knowledge base, generated insights, and interaction logs are owned
//! by the wider platform; vigil reads them by explicit time window and
//! never writes.

use async_trait::async_trait;

use crate::domain::models::{InsightRecord, InteractionRecord, KnowledgeRecord, TimeWindow};
use crate::domain::ports::errors::AdapterFault;

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn knowledge_records(
        &self,
        window: TimeWindow,
        limit: usize,
    ) -> Result<Vec<KnowledgeRecord>, AdapterFault>;

    async fn insight_records(
        &self,
        window: TimeWindow,
        limit: usize,
    ) -> Result<Vec<InsightRecord>, AdapterFault>;

    async fn interaction_records(
        &self,
        window: TimeWindow,
        limit: usize,
    ) -> Result<Vec<InteractionRecord>, AdapterFault>;
}

#[cfg(test)]
pub mod tests_support {
    use super::*;

    /// Canned data source for suite unit tests. Window filtering is
    /// assumed done by the fixture; only the limit is honored.
    #[derive(Debug, Clone, Default)]
    pub struct FixedDataSource {
        pub knowledge: Vec<KnowledgeRecord>,
        pub insights: Vec<InsightRecord>,
        pub interactions: Vec<InteractionRecord>,
    }

    #[async_trait]
    impl DataSource for FixedDataSource {
        async fn knowledge_records(
            &self,
            _window: TimeWindow,
            limit: usize,
        ) -> Result<Vec<KnowledgeRecord>, AdapterFault> {
            Ok(self.knowledge.iter().take(limit).cloned().collect())
        }

        async fn insight_records(
            &self,
            _window: TimeWindow,
            limit: usize,
        ) -> Result<Vec<InsightRecord>, AdapterFault> {
            Ok(self.insights.iter().take(limit).cloned().collect())
        }

        async fn interaction_records(
            &self,
            _window: TimeWindow,
            limit: usize,
        ) -> Result<Vec<InteractionRecord>, AdapterFault> {
            Ok(self.interactions.iter().take(limit).cloned().collect())
        }
    }
}
