//! Business logic: orchestration, aggregation, alerting, scheduling.

pub mod alerts;
pub mod baseline;
pub mod health;
pub mod orchestrator;
pub mod retention;
pub mod scheduler;
pub mod suites;

pub use alerts::AlertEngine;
pub use health::HealthEngine;
pub use orchestrator::{Orchestrator, RunRequest};
pub use retention::{RetentionSweeper, SweepOutcome};
pub use scheduler::Scheduler;
