//! Alert domain model.
//!
//! Alerts are created by the alert engine only; severity comes from the
//! documented rule table, never from an adapter. Lifecycle:
//! unacknowledged -> acknowledged -> resolved, driven by operator
//! action. Resolved alerts are archived by the retention sweep, never
//! auto-deleted before that.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    Performance,
    Failure,
    Health,
    Compliance,
    Fairness,
    Security,
}

impl AlertCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Performance => "performance",
            Self::Failure => "failure",
            Self::Health => "health",
            Self::Compliance => "compliance",
            Self::Fairness => "fairness",
            Self::Security => "security",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "performance" => Some(Self::Performance),
            "failure" => Some(Self::Failure),
            "health" => Some(Self::Health),
            "compliance" => Some(Self::Compliance),
            "fairness" => Some(Self::Fairness),
            "security" => Some(Self::Security),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// Actionable notification derived from results or health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub alert_id: Uuid,
    /// Idempotence key: one alert per (run or window, rule). Re-running
    /// the engine over the same run never duplicates alerts.
    pub dedupe_key: String,
    /// Absent for trend-based alerts not tied to one run
    pub source_run_id: Option<Uuid>,
    pub category: AlertCategory,
    pub severity: AlertSeverity,
    pub message: String,
    /// The numbers that triggered the alert, so downstream systems can
    /// re-derive the decision. Never free text alone.
    pub structured_context: serde_json::Value,
    pub acknowledged: bool,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Alert {
    pub fn new(
        dedupe_key: impl Into<String>,
        source_run_id: Option<Uuid>,
        category: AlertCategory,
        severity: AlertSeverity,
        message: impl Into<String>,
        structured_context: serde_json::Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            alert_id: Uuid::new_v4(),
            dedupe_key: dedupe_key.into(),
            source_run_id,
            category,
            severity,
            message: message.into(),
            structured_context,
            acknowledged: false,
            resolved: false,
            created_at,
            resolved_at: None,
        }
    }
}
