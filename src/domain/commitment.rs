// ==========================================
// School Timetable Scheduling - teacher availability inputs
// ==========================================
// Responsibility: the read-only constraint data owned by other subsystems.
// Commitments come from the appointment module; existing placements are
// lessons already committed to other classes.
// ==========================================

use crate::domain::types::{ClassId, TeacherId, TimeRange, Weekday};
use serde::{Deserialize, Serialize};

/// A teacher's fixed weekly obligation, independent of any class. One
/// commitment can block several weekdays (the appointment form lets a
/// teacher pick a set of days for the same time window).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherCommitment {
    pub teacher_id: TeacherId,
    /// Free-text location label, carried into conflict diagnostics.
    pub location: String,
    pub weekdays: Vec<Weekday>,
    pub window: TimeRange,
}

impl TeacherCommitment {
    /// True iff this commitment blocks `weekday` at a time overlapping
    /// `window`.
    pub fn blocks(&self, weekday: Weekday, window: &TimeRange) -> bool {
        self.weekdays.contains(&weekday) && self.window.overlaps(window)
    }
}

/// A lesson the teacher already holds in a different class. The class id is
/// the *other* class, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingLessonPlacement {
    pub teacher_id: TeacherId,
    pub class_id: ClassId,
    pub weekday: Weekday,
    pub window: TimeRange,
}

/// Immutable snapshot of everything that constrains the involved teachers,
/// fetched once up front by the caller. Generation never reads live data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherConstraintSet {
    pub commitments: Vec<TeacherCommitment>,
    pub existing_placements: Vec<ExistingLessonPlacement>,
}

impl TeacherConstraintSet {
    pub fn new(
        commitments: Vec<TeacherCommitment>,
        existing_placements: Vec<ExistingLessonPlacement>,
    ) -> Self {
        Self {
            commitments,
            existing_placements,
        }
    }
}
