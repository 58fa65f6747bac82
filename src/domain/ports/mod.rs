//! Ports: the traits the domain depends on, implemented by adapters.

pub mod alert_repository;
pub mod baseline_repository;
pub mod data_source;
pub mod errors;
pub mod job_repository;
pub mod judge;
pub mod result_repository;
pub mod summary_repository;

pub use alert_repository::AlertRepository;
pub use baseline_repository::BaselineRepository;
pub use data_source::DataSource;
pub use errors::{AdapterFault, DatabaseError, JudgeError};
pub use job_repository::JobRepository;
pub use judge::{Judge, StaticJudge};
pub use result_repository::{ResultFilters, ResultRepository};
pub use summary_repository::SummaryRepository;
