//! Vigil: test orchestration and health aggregation for AI knowledge
//! platforms.
//!
//! Nine suite adapters evaluate a platform's knowledge, insight, and
//! interaction stores over explicit time windows. The orchestrator
//! dispatches them with partial-failure isolation, the health engine
//! aggregates stored results into graded reports, and the alert engine
//! turns findings into deduplicated, actionable alerts.
//!
//! Layering follows hexagonal architecture: `domain` holds pure models
//! and port traits, `adapters` the SQLite implementations,
//! `infrastructure` the config and judge integrations, and `services`
//! the business logic the CLI drives.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::models::{
    Alert, AlertCategory, AlertSeverity, BaselineEntry, BaselineVerdict, Environment, HealthGrade,
    HealthReport, MetricDirection, RunStatus, RunSummary, Suite, TestResult, TestSeverity,
    TestStatus, TimeWindow,
};
pub use services::{AlertEngine, HealthEngine, Orchestrator, RunRequest};
