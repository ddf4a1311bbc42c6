// ==========================================
// School Timetable Scheduling - scheduler error types
// ==========================================
// Every failure is an explicit result value the caller can pattern-match on;
// no panic crosses the crate boundary.
// ==========================================

use crate::domain::{SubjectId, TeacherId, Timetable};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why one lesson-unit could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnplacedReason {
    /// Every remaining cell conflicts with the teacher's commitments,
    /// cross-class lessons, or lessons placed earlier in this run.
    TeacherConflict,
    /// The teacher is free somewhere, but the subject already holds the
    /// daily maximum on every day with a free cell.
    SubjectCapReached,
    /// No unfilled cell remains at all.
    NoCapacity,
}

impl fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnplacedReason::TeacherConflict => write!(f, "TEACHER_CONFLICT"),
            UnplacedReason::SubjectCapReached => write!(f, "SUBJECT_CAP_REACHED"),
            UnplacedReason::NoCapacity => write!(f, "NO_CAPACITY"),
        }
    }
}

/// One lesson-unit the scheduler failed to place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnplacedLesson {
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub reason: UnplacedReason,
}

/// A best-effort placement subset plus the units that did not fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialSchedule {
    pub placements: Timetable,
    pub unplaced: Vec<UnplacedLesson>,
    /// Backtracking attempts consumed before giving up.
    pub attempts: u64,
}

impl fmt::Display for PartialSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lessons placed, {} unplaced after {} attempts",
            self.placements.len(),
            self.unplaced.len(),
            self.attempts
        )
    }
}

/// Scheduler failure taxonomy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// Sum of weekly lesson counts does not equal the weekly slot capacity.
    /// Generation is never attempted against a structurally infeasible
    /// instance.
    #[error("capacity mismatch: {required} lessons required but the weekly grid holds {available} slots")]
    CapacityMismatch { required: usize, available: usize },

    /// Backtracking budget exhausted (or the instance proved infeasible);
    /// carries the partial placement and per-unit reasons.
    #[error("incomplete timetable: {0}")]
    PartialFailure(PartialSchedule),

    #[error("class has no subject assignments")]
    EmptyAssignments,

    /// A subject may appear at most once per class in a generation run.
    #[error("duplicate assignment for subject {subject_id}")]
    DuplicateSubject { subject_id: SubjectId },

    #[error("assignment for subject {subject_id} requests zero weekly lessons")]
    ZeroLessonAssignment { subject_id: SubjectId },
}
