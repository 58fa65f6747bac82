//! Suite and test-outcome vocabulary.
//!
//! A suite is a named category of related checks. Every result a suite
//! emits carries a status, and a severity declared by the suite itself
//! (severity feeds the alert rule table, never ad hoc decisions).

use serde::{Deserialize, Serialize};

/// The nine test suite categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suite {
    /// Semantic accuracy of stored knowledge vs. recorded queries
    Semantic,
    /// Calibration of insight confidence against judged correctness
    Predictive,
    /// Agreement between non-text artifacts and their descriptions
    Multimodal,
    /// Freshness and latency of recent interactions
    Realtime,
    /// Segment-conditioned relevance of delivered insights
    Personalization,
    /// Demographic parity / equal opportunity across protected attributes
    Fairness,
    /// PII exposure and access-pattern anomalies
    Security,
    /// Cross-store referential consistency
    Integration,
    /// Metric regression against the baseline registry
    Performance,
}

impl Suite {
    /// All suites, in the order the orchestrator dispatches them.
    pub const ALL: [Suite; 9] = [
        Self::Semantic,
        Self::Predictive,
        Self::Multimodal,
        Self::Realtime,
        Self::Personalization,
        Self::Fairness,
        Self::Security,
        Self::Integration,
        Self::Performance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Semantic => "semantic",
            Self::Predictive => "predictive",
            Self::Multimodal => "multimodal",
            Self::Realtime => "realtime",
            Self::Personalization => "personalization",
            Self::Fairness => "fairness",
            Self::Security => "security",
            Self::Integration => "integration",
            Self::Performance => "performance",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "semantic" => Some(Self::Semantic),
            "predictive" => Some(Self::Predictive),
            "multimodal" => Some(Self::Multimodal),
            "realtime" | "real_time" | "real-time" => Some(Self::Realtime),
            "personalization" => Some(Self::Personalization),
            "fairness" | "bias" => Some(Self::Fairness),
            "security" | "compliance" => Some(Self::Security),
            "integration" => Some(Self::Integration),
            "performance" | "regression" => Some(Self::Performance),
            _ => None,
        }
    }
}

impl std::fmt::Display for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// Check evaluated true
    Passed,
    /// Check evaluated false (expected assertion failure, not a fault)
    Failed,
    /// Check passed but inside the warning band
    Warning,
    /// Check could not be evaluated (insufficient data, missing policy)
    Skipped,
    /// The adapter raised an unexpected fault
    Error,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Warning => "warning",
            Self::Skipped => "skipped",
            Self::Error => "error",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "passed" | "pass" => Some(Self::Passed),
            "failed" | "fail" => Some(Self::Failed),
            "warning" | "warn" => Some(Self::Warning),
            "skipped" | "skip" => Some(Self::Skipped),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity a suite declares for one of its checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestSeverity {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl Default for TestSeverity {
    fn default() -> Self {
        Self::Medium
    }
}

impl TestSeverity {
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

/// Deployment environment a run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Default for Environment {
    fn default() -> Self {
        Self::Development
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "staging" => Some(Self::Staging),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suite_roundtrip() {
        for suite in Suite::ALL {
            assert_eq!(Suite::from_str(suite.as_str()), Some(suite));
        }
    }

    #[test]
    fn suite_aliases() {
        assert_eq!(Suite::from_str("bias"), Some(Suite::Fairness));
        assert_eq!(Suite::from_str("real-time"), Some(Suite::Realtime));
        assert_eq!(Suite::from_str("unknown"), None);
    }

    #[test]
    fn severity_ordering() {
        assert!(TestSeverity::Critical > TestSeverity::High);
        assert!(TestSeverity::High > TestSeverity::Medium);
        assert!(TestSeverity::Medium > TestSeverity::Low);
    }
}
