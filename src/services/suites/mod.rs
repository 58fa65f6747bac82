//! Suite adapters.
//!
//! One adapter per test category. The shared contract: expected
//! assertion failures come back as FAILED/WARNING results; only
//! infrastructure faults (data source unreachable, malformed data)
//! escape as `AdapterFault`, which the orchestrator converts into a
//! single ERROR result for the suite. Sampling policy is suite-specific
//! and documented on each adapter.

pub mod fairness;
pub mod integration;
pub mod multimodal;
pub mod performance;
pub mod personalization;
pub mod predictive;
pub mod realtime;
pub mod security;
pub mod semantic;

pub use fairness::FairnessSuite;
pub use integration::IntegrationSuite;
pub use multimodal::MultimodalSuite;
pub use performance::PerformanceSuite;
pub use personalization::PersonalizationSuite;
pub use predictive::PredictiveSuite;
pub use realtime::RealtimeSuite;
pub use security::SecuritySuite;
pub use semantic::SemanticSuite;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::models::{Environment, Suite, SuitePolicies, TestResult, TimeWindow};
use crate::domain::ports::errors::AdapterFault;
use crate::domain::ports::{BaselineRepository, DataSource, Judge};

/// Everything an adapter needs for one run. The window is explicit;
/// adapters never read the wall clock.
#[derive(Clone)]
pub struct SuiteContext {
    pub run_id: Uuid,
    pub environment: Environment,
    pub window: TimeWindow,
    /// Timestamp results are recorded with (the run's start instant)
    pub now: DateTime<Utc>,
    pub judge: Arc<dyn Judge>,
    pub data: Arc<dyn DataSource>,
    pub baselines: Arc<dyn BaselineRepository>,
    pub policies: SuitePolicies,
}

/// Interface all nine suites implement.
#[async_trait]
pub trait SuiteAdapter: Send + Sync {
    fn suite(&self) -> Suite;

    async fn run(&self, ctx: &SuiteContext) -> Result<Vec<TestResult>, AdapterFault>;
}

/// Threshold helper shared by the accuracy-style suites: at or above
/// `pass` passes, at or above `warn` warns, below fails.
pub(crate) fn grade_by_threshold(
    score: f64,
    pass: f64,
    warn: f64,
) -> crate::domain::models::TestStatus {
    use crate::domain::models::TestStatus;
    if score >= pass {
        TestStatus::Passed
    } else if score >= warn {
        TestStatus::Warning
    } else {
        TestStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TestStatus;

    #[test]
    fn threshold_grading() {
        assert_eq!(grade_by_threshold(0.9, 0.85, 0.75), TestStatus::Passed);
        assert_eq!(grade_by_threshold(0.85, 0.85, 0.75), TestStatus::Passed);
        assert_eq!(grade_by_threshold(0.8, 0.85, 0.75), TestStatus::Warning);
        assert_eq!(grade_by_threshold(0.5, 0.85, 0.75), TestStatus::Failed);
    }
}
