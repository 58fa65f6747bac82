//! Business data records consumed read-only by the suite adapters.
//!
//! The wider platform owns these stores; vigil prescribes nothing
//! beyond a timestamp, an identifier, and the suite-relevant attributes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A knowledge base document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    pub id: String,
    pub content: String,
    /// The query this record was retrieved/stored for, when known
    pub source_query: Option<String>,
    /// Reference to a non-text artifact (image, file) if any
    pub attachment_ref: Option<String>,
    pub attachment_caption: Option<String>,
    pub department: Option<String>,
    pub confidence: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// An AI-generated insight derived from knowledge records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightRecord {
    pub id: String,
    pub knowledge_id: Option<String>,
    pub content: String,
    /// Confidence the generator stated for this insight
    pub confidence: f64,
    pub department: Option<String>,
    pub target_role: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One user interaction with a delivered insight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: String,
    pub insight_id: Option<String>,
    pub user_role: Option<String>,
    pub department: Option<String>,
    pub region: Option<String>,
    pub seniority: Option<String>,
    pub gender: Option<String>,
    /// Whether the interaction ended in a positive outcome
    pub positive_outcome: bool,
    pub relevance_score: Option<f64>,
    pub feedback_score: Option<f64>,
    pub latency_ms: Option<u64>,
    pub created_at: DateTime<Utc>,
}
