//! Shared fixtures for integration tests.

// Not every test binary uses every fixture
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use vigil::adapters::sqlite::{all_embedded_migrations, create_test_pool, Migrator};
use vigil::domain::models::{
    InsightRecord, InteractionRecord, KnowledgeRecord, TimeWindow,
};
use vigil::domain::ports::errors::AdapterFault;
use vigil::domain::ports::DataSource;

/// Fresh in-memory database with the full schema applied.
pub async fn migrated_pool() -> SqlitePool {
    let pool = create_test_pool().await.expect("test pool");
    Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .expect("migrations");
    pool
}

/// Canned data source serving fixed record sets.
#[derive(Debug, Clone, Default)]
pub struct CannedDataSource {
    pub knowledge: Vec<KnowledgeRecord>,
    pub insights: Vec<InsightRecord>,
    pub interactions: Vec<InteractionRecord>,
}

#[async_trait]
impl DataSource for CannedDataSource {
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

/// Data source whose knowledge store is down; insight and interaction
/// reads still work. Exercises per-suite fault isolation.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeOutageDataSource {
    pub interactions: Vec<InteractionRecord>,
}

#[async_trait]
impl DataSource for KnowledgeOutageDataSource {
    async fn knowledge_records(
        &self,
        _window: TimeWindow,
        _limit: usize,
    ) -> Result<Vec<KnowledgeRecord>, AdapterFault> {
        Err(AdapterFault::DataSourceUnavailable(
            "knowledge store connection refused".to_string(),
        ))
    }

    async fn insight_records(
        &self,
        _window: TimeWindow,
        _limit: usize,
    ) -> Result<Vec<InsightRecord>, AdapterFault> {
        Ok(Vec::new())
    }

    async fn interaction_records(
        &self,
        _window: TimeWindow,
        limit: usize,
    ) -> Result<Vec<InteractionRecord>, AdapterFault> {
        Ok(self.interactions.iter().take(limit).cloned().collect())
    }
}

pub fn knowledge_record(id: &str, query: &str, created_at: DateTime<Utc>) -> KnowledgeRecord {
    KnowledgeRecord {
        id: id.to_string(),
        content: format!("content for {id}"),
        source_query: Some(query.to_string()),
        attachment_ref: None,
        attachment_caption: None,
        department: Some("engineering".to_string()),
        confidence: Some(0.9),
        created_at,
    }
}

pub fn interaction_record(latency_ms: u64, created_at: DateTime<Utc>) -> InteractionRecord {
    InteractionRecord {
        id: Uuid::new_v4().to_string(),
        insight_id: None,
        user_role: None,
        department: Some("engineering".to_string()),
        region: None,
        seniority: None,
        gender: None,
        positive_outcome: true,
        relevance_score: Some(0.85),
        feedback_score: Some(0.8),
        latency_ms: Some(latency_ms),
        created_at,
    }
}
