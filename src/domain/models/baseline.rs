//! Baseline registry domain model.
//!
//! A baseline is a recorded expected value for a (test, metric) pair
//! with a symmetric tolerance band. Changing a baseline is an explicit
//! administrative action, never a side-effect of a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which direction of movement counts as degradation.
///
/// Required and explicit on every entry; directionality is never
/// inferred from metric names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricDirection {
    /// Throughput-style metrics: falling below the band is degradation
    HigherIsBetter,
    /// Latency-style metrics: rising above the band is degradation
    LowerIsBetter,
}

impl MetricDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HigherIsBetter => "higher_is_better",
            Self::LowerIsBetter => "lower_is_better",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "higher_is_better" | "higher" => Some(Self::HigherIsBetter),
            "lower_is_better" | "lower" => Some(Self::LowerIsBetter),
            _ => None,
        }
    }
}

/// Classification of a measurement against its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineVerdict {
    Improved,
    Stable,
    Degraded,
}

impl BaselineVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improved => "improved",
            Self::Stable => "stable",
            Self::Degraded => "degraded",
        }
    }
}

/// Expected-value reference for one (test, metric) pair.
///
/// At most one active entry per pair; updates are full replacements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineEntry {
    pub test_name: String,
    pub metric_name: String,
    pub baseline_value: f64,
    /// Symmetric band as a fraction (0.2 = 20%)
    pub tolerance_pct: f64,
    pub direction: MetricDirection,
    pub updated_at: DateTime<Utc>,
}

impl BaselineEntry {
    pub fn new(
        test_name: impl Into<String>,
        metric_name: impl Into<String>,
        baseline_value: f64,
        tolerance_pct: f64,
        direction: MetricDirection,
    ) -> Self {
        Self {
            test_name: test_name.into(),
            metric_name: metric_name.into(),
            baseline_value,
            tolerance_pct,
            direction,
            updated_at: Utc::now(),
        }
    }
}
