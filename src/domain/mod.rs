// ==========================================
// School Timetable Scheduling - domain layer
// ==========================================
// Entities and value types. No persistence, no engine logic.
// ==========================================

pub mod assignment;
pub mod commitment;
pub mod schedule_template;
pub mod timetable;
pub mod types;

pub use assignment::{required_lessons, Assignment};
pub use commitment::{ExistingLessonPlacement, TeacherCommitment, TeacherConstraintSet};
pub use schedule_template::{ClassScheduleTemplate, TemplateError};
pub use timetable::{LessonPlacement, Timetable};
pub use types::{ClassId, ClassKind, PlacementOrigin, SubjectId, TeacherId, TimeRange, Weekday};
