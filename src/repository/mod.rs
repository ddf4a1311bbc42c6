// ==========================================
// School Timetable Scheduling - repository layer
// ==========================================
// Data access only. Registry data (classes, subjects, teachers, assignments,
// commitments) is read-only here; lesson placements are the one read-write
// aggregate, always replaced or cleared as a whole in a single transaction.
// ==========================================

pub mod class_repo;
pub mod commitment_repo;
pub mod error;
pub mod timetable_repo;

pub use class_repo::{ClassRepository, ClassRow};
pub use commitment_repo::CommitmentRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use timetable_repo::TimetableRepository;

use crate::domain::{TimeRange, Weekday};
use chrono::NaiveTime;

/// Format a time for storage (`HH:MM`).
pub(crate) fn time_to_db(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Decode a stored `HH:MM` time.
pub(crate) fn time_from_db(field: &str, raw: &str) -> RepositoryResult<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|e| RepositoryError::DataIntegrity {
        field: field.to_string(),
        message: format!("bad time '{raw}': {e}"),
    })
}

/// Decode a stored time pair into a range.
pub(crate) fn range_from_db(field: &str, start: &str, end: &str) -> RepositoryResult<TimeRange> {
    Ok(TimeRange::new(
        time_from_db(field, start)?,
        time_from_db(field, end)?,
    ))
}

/// Decode a stored weekday string.
pub(crate) fn weekday_from_db(field: &str, raw: &str) -> RepositoryResult<Weekday> {
    Weekday::from_db_str(raw).ok_or_else(|| RepositoryError::DataIntegrity {
        field: field.to_string(),
        message: format!("unknown weekday '{raw}'"),
    })
}

/// Decode a stored UUID string.
pub(crate) fn uuid_from_db(field: &str, raw: &str) -> RepositoryResult<uuid::Uuid> {
    uuid::Uuid::parse_str(raw.trim()).map_err(|e| RepositoryError::DataIntegrity {
        field: field.to_string(),
        message: format!("bad uuid '{raw}': {e}"),
    })
}
