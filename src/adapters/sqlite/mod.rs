//! SQLite adapters for the vigil persistence ports.

pub mod alert_repository;
pub mod baseline_repository;
pub mod connection;
pub mod data_source;
pub mod job_repository;
pub mod migrations;
pub mod result_repository;
pub mod summary_repository;

pub use alert_repository::SqliteAlertRepository;
pub use baseline_repository::SqliteBaselineRepository;
pub use connection::{create_pool, create_test_pool, ConnectionError, PoolConfig};
pub use data_source::SqliteDataSource;
pub use job_repository::SqliteJobRepository;
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use result_repository::SqliteResultRepository;
pub use summary_repository::SqliteSummaryRepository;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::errors::DatabaseError;

/// Parse a UUID string from a SQLite row field.
pub fn parse_uuid(s: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(DatabaseError::from)
}

/// Parse an optional UUID string from a SQLite row field.
pub fn parse_optional_uuid(s: Option<String>) -> Result<Option<Uuid>, DatabaseError> {
    s.map(|s| Uuid::parse_str(&s))
        .transpose()
        .map_err(DatabaseError::from)
}

/// Parse an RFC3339 timestamp from a SQLite row field.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(DatabaseError::from)
}
