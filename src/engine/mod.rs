// ==========================================
// School Timetable Scheduling - engine layer
// ==========================================
// Business rules only: no SQL in engines, every rule outputs a reason.
// ==========================================

pub mod constraint_model;
pub mod error;
pub mod scheduler;
pub mod time_grid;
pub mod validator;

pub use constraint_model::ConstraintModel;
pub use error::{PartialSchedule, SchedulerError, UnplacedLesson, UnplacedReason};
pub use scheduler::Scheduler;
pub use time_grid::{LessonSlot, TimeGrid};
pub use validator::{ScheduleValidator, Violation, ViolationKind};
