// ==========================================
// School Timetable Scheduling - subject/teacher assignment
// ==========================================

use crate::domain::types::{SubjectId, TeacherId};
use serde::{Deserialize, Serialize};

/// One subject taught in one class: which teacher holds it and how many
/// lessons it takes per week. A subject has exactly one teacher per class in
/// a generation run; the scheduler rejects duplicate subject entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub weekly_lessons: u32,
}

impl Assignment {
    pub fn new(subject_id: SubjectId, teacher_id: TeacherId, weekly_lessons: u32) -> Self {
        Self {
            subject_id,
            teacher_id,
            weekly_lessons,
        }
    }
}

/// Total number of lesson slots a set of assignments must fill.
pub fn required_lessons(assignments: &[Assignment]) -> usize {
    assignments
        .iter()
        .map(|a| a.weekly_lessons as usize)
        .sum()
}
