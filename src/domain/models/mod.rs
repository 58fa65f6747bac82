//! Domain models: pure types with no I/O.

pub mod alert;
pub mod baseline;
pub mod config;
pub mod health;
pub mod job;
pub mod records;
pub mod run_summary;
pub mod suite;
pub mod test_result;
pub mod window;

pub use alert::{Alert, AlertCategory, AlertSeverity};
pub use baseline::{BaselineEntry, BaselineVerdict, MetricDirection};
pub use config::{
    Config, DatabaseConfig, FairnessPolicy, JudgeConfig, LoggingConfig, OrchestratorConfig,
    RetentionConfig, SuitePolicies,
};
pub use health::{HealthGrade, HealthReport, SuiteTrend, TrendDirection};
pub use job::{JobFrequency, JobParameters, JobStatus, ScheduledJob};
pub use records::{InsightRecord, InteractionRecord, KnowledgeRecord};
pub use run_summary::{RunStatus, RunSummary};
pub use suite::{Environment, Suite, TestSeverity, TestStatus};
pub use test_result::{SuiteDetail, TestResult};
pub use window::TimeWindow;
