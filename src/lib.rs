// ==========================================
// School Timetable Scheduling - core library
// ==========================================
// Weekly timetable generation and validation for a school administration
// system. The scheduler is deterministic and locally verifiable; every
// candidate timetable (including externally proposed ones) passes the
// independent validator before it is persisted.
// ==========================================

// Domain layer - entities and value types
pub mod domain;

// Repository layer - data access
pub mod repository;

// Engine layer - scheduling rules
pub mod engine;

// Configuration layer
pub mod config;

// Database infrastructure (connection setup / PRAGMA policy / schema)
pub mod db;

// Logging
pub mod logging;

// API layer - host-facing contract
pub mod api;

// ==========================================
// Re-exports
// ==========================================

// Domain types
pub use domain::{
    Assignment, ClassId, ClassKind, ClassScheduleTemplate, ExistingLessonPlacement,
    LessonPlacement, PlacementOrigin, SubjectId, TeacherCommitment, TeacherConstraintSet,
    TeacherId, TimeRange, Timetable, Weekday,
};

// Engines
pub use engine::{
    ConstraintModel, PartialSchedule, ScheduleValidator, Scheduler, SchedulerError, TimeGrid,
    UnplacedLesson, UnplacedReason, Violation, ViolationKind,
};

// Configuration
pub use config::{ConfigManager, SchedulingConfig};

// API
pub use api::{ApiError, ApiResult, ClassContext, TimetableApi};

// ==========================================
// Constants
// ==========================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// System name.
pub const APP_NAME: &str = "School Timetable Scheduling System";

/// Database schema tag.
pub const DB_VERSION: &str = "v1";
