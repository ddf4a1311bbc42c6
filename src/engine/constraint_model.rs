// ==========================================
// School Timetable Scheduling - constraint model
// ==========================================
// Responsibility: one generation run's mutable constraint state.
// Input: teacher constraint snapshot (commitments + cross-class lessons)
// Output: availability predicate + subject/day counters
// ==========================================
// Invariant: exclusion windows merge external data and in-run placements,
// so a pass can never double-book a teacher it has just placed.
// ==========================================

use crate::domain::{SubjectId, TeacherConstraintSet, TeacherId, TimeRange, Weekday};
use std::collections::HashMap;

// ==========================================
// ConstraintModel
// ==========================================
#[derive(Debug, Clone)]
pub struct ConstraintModel {
    /// Per-teacher, per-weekday exclusion windows.
    exclusions: HashMap<TeacherId, HashMap<Weekday, Vec<TimeRange>>>,
    /// Lessons already counted per (subject, weekday) in this run.
    subject_day_counts: HashMap<(SubjectId, Weekday), u32>,
    subject_daily_cap: u32,
}

impl ConstraintModel {
    /// Precompute exclusion windows from a constraint snapshot.
    pub fn from_constraints(constraints: &TeacherConstraintSet, subject_daily_cap: u32) -> Self {
        let mut exclusions: HashMap<TeacherId, HashMap<Weekday, Vec<TimeRange>>> = HashMap::new();

        for commitment in &constraints.commitments {
            let by_day = exclusions.entry(commitment.teacher_id).or_default();
            for weekday in &commitment.weekdays {
                by_day.entry(*weekday).or_default().push(commitment.window);
            }
        }

        for existing in &constraints.existing_placements {
            exclusions
                .entry(existing.teacher_id)
                .or_default()
                .entry(existing.weekday)
                .or_default()
                .push(existing.window);
        }

        Self {
            exclusions,
            subject_day_counts: HashMap::new(),
            subject_daily_cap,
        }
    }

    /// True iff `window` does not intersect any exclusion window of this
    /// teacher on `weekday`. Intervals are half-open.
    pub fn is_teacher_free(&self, teacher_id: TeacherId, weekday: Weekday, window: &TimeRange) -> bool {
        self.exclusions
            .get(&teacher_id)
            .and_then(|by_day| by_day.get(&weekday))
            .map(|windows| !windows.iter().any(|w| w.overlaps(window)))
            .unwrap_or(true)
    }

    /// True iff the subject already holds the daily maximum on `weekday`.
    pub fn subject_cap_reached(&self, subject_id: SubjectId, weekday: Weekday) -> bool {
        self.subject_day_counts
            .get(&(subject_id, weekday))
            .map(|count| *count >= self.subject_daily_cap)
            .unwrap_or(false)
    }

    pub fn subject_daily_cap(&self) -> u32 {
        self.subject_daily_cap
    }

    /// Record one placement: the teacher becomes busy for the window and the
    /// subject/day counter advances.
    pub fn record_placement(
        &mut self,
        subject_id: SubjectId,
        teacher_id: TeacherId,
        weekday: Weekday,
        window: TimeRange,
    ) {
        self.exclusions
            .entry(teacher_id)
            .or_default()
            .entry(weekday)
            .or_default()
            .push(window);
        *self
            .subject_day_counts
            .entry((subject_id, weekday))
            .or_insert(0) += 1;
    }

    /// Undo of `record_placement` for backtracking: removes exactly one
    /// matching exclusion window and decrements the counter.
    pub fn release_placement(
        &mut self,
        subject_id: SubjectId,
        teacher_id: TeacherId,
        weekday: Weekday,
        window: TimeRange,
    ) {
        if let Some(windows) = self
            .exclusions
            .get_mut(&teacher_id)
            .and_then(|by_day| by_day.get_mut(&weekday))
        {
            if let Some(pos) = windows.iter().rposition(|w| *w == window) {
                windows.remove(pos);
            }
        }
        if let Some(count) = self.subject_day_counts.get_mut(&(subject_id, weekday)) {
            *count = count.saturating_sub(1);
        }
    }
}
