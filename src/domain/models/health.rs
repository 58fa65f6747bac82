//! Health report domain model.
//!
//! Grade bands are a single policy table applied identically to every
//! suite so cross-suite comparison stays meaningful.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::suite::Suite;
use super::window::TimeWindow;

/// Overall health grade from fixed violation-rate bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthGrade {
    Excellent,
    Good,
    NeedsImprovement,
    Critical,
}

impl HealthGrade {
    /// Violations = failed + critical warnings over total evaluated.
    /// <=5% Excellent, <=10% Good, <=20% NeedsImprovement, else Critical.
    pub fn from_violation_rate(rate: f64) -> Self {
        if rate <= 0.05 {
            Self::Excellent
        } else if rate <= 0.10 {
            Self::Good
        } else if rate <= 0.20 {
            Self::NeedsImprovement
        } else {
            Self::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::NeedsImprovement => "needs_improvement",
            Self::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

/// One suite's trend vs. the immediately preceding equal-length window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteTrend {
    pub suite: Suite,
    pub current_avg_score: f64,
    pub prior_avg_score: Option<f64>,
    pub direction: TrendDirection,
}

/// Aggregate health over a window (a run_id's span or a time range).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub window: TimeWindow,
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub warned: usize,
    pub skipped: usize,
    pub errored: usize,
    /// `None` when no tests were evaluated in the window
    pub success_rate: Option<f64>,
    pub violation_rate: f64,
    pub grade: HealthGrade,
    /// Keyed by suite for stable iteration order in reports
    pub suite_trends: BTreeMap<String, SuiteTrend>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_bands() {
        assert_eq!(HealthGrade::from_violation_rate(0.0), HealthGrade::Excellent);
        assert_eq!(HealthGrade::from_violation_rate(0.05), HealthGrade::Excellent);
        assert_eq!(HealthGrade::from_violation_rate(0.07), HealthGrade::Good);
        assert_eq!(HealthGrade::from_violation_rate(0.10), HealthGrade::Good);
        assert_eq!(HealthGrade::from_violation_rate(0.15), HealthGrade::NeedsImprovement);
        assert_eq!(HealthGrade::from_violation_rate(0.20), HealthGrade::NeedsImprovement);
        assert_eq!(HealthGrade::from_violation_rate(0.21), HealthGrade::Critical);
    }
}
