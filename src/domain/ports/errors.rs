//! Error types shared by the ports.

use thiserror::Error;

/// Persistence-layer error.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),

    #[error("UUID parse error: {0}")]
    UuidParseError(#[from] uuid::Error),

    #[error("DateTime parse error: {0}")]
    DateTimeParseError(#[from] chrono::ParseError),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Not found: {0}")]
    NotFound(uuid::Uuid),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

/// AI judgment service error.
///
/// Transient errors get one bounded retry in the client; permanent
/// errors fail fast. Adapters translate exhausted judge failures into
/// `Skipped` results, never silent passes.
#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("Judge request failed: {0}")]
    RequestFailed(String),

    #[error("Judge rate limit exceeded")]
    RateLimited,

    #[error("Judge request timed out")]
    Timeout,

    #[error("Judge returned malformed response: {0}")]
    MalformedResponse(String),

    #[error("Judge authentication failed")]
    AuthFailed,
}

impl JudgeError {
    /// Transient errors are worth one retry; client errors are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Timeout | Self::RequestFailed(_)
        )
    }
}

/// Infrastructure fault raised by a suite adapter past its boundary.
///
/// Expected assertion failures are never faults; only unreachable data
/// sources, malformed data, and the like escape an adapter. The
/// orchestrator converts each fault into one ERROR test result.
#[derive(Error, Debug)]
pub enum AdapterFault {
    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Malformed data: {0}")]
    MalformedData(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}
