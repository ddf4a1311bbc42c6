// ==========================================
// School Timetable Scheduling - API layer error types
// ==========================================
// Responsibility: one error surface for callers, pattern-matchable by kind.
// Every message carries an explicit reason.
// ==========================================

use crate::engine::error::SchedulerError;
use crate::engine::validator::Violation;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API-layer error type.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A candidate timetable failed independent verification. Raised both
    /// for externally supplied candidates and, as a stale-data safety net,
    /// by the re-validation inside the save path.
    #[error("candidate timetable rejected: {} violation(s)", .violations.len())]
    ValidationRejected { violations: Vec<Violation> },

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("repository error: {0}")]
    Repository(RepositoryError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{entity} with id={id}"))
            }
            other => ApiError::Repository(other),
        }
    }
}

/// Result alias for the API layer.
pub type ApiResult<T> = Result<T, ApiError>;
