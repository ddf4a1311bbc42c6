// ==========================================
// School Timetable Scheduling - API layer
// ==========================================

pub mod error;
pub mod timetable_api;

pub use error::{ApiError, ApiResult};
pub use timetable_api::{ClassContext, TimetableApi};
