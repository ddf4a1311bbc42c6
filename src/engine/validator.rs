// ==========================================
// School Timetable Scheduling - schedule validator
// ==========================================
// Responsibility: independent re-check of a candidate timetable against all
// hard constraints before it is accepted. Candidates may come from the
// scheduler or from an external proposer; both are treated as untrusted
// suggestions here.
// ==========================================
// The validator never mutates its input. Every rule outputs a reason.
// ==========================================

use crate::config::SchedulingConfig;
use crate::domain::{
    required_lessons, Assignment, ClassScheduleTemplate, LessonPlacement, SubjectId,
    TeacherConstraintSet, Timetable, Weekday,
};
use crate::engine::constraint_model::ConstraintModel;
use crate::engine::time_grid::TimeGrid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

// ==========================================
// Violation kinds
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    /// Placement counts do not match the assignment requirements.
    Completeness,
    /// A placement does not exactly occupy one grid slot.
    SlotAlignment,
    /// Two placements of this class share the same (weekday, slot).
    DoubleBooking,
    /// A placement overlaps the teacher's commitments or lessons held in
    /// other classes.
    TeacherAvailability,
    /// The same teacher holds two overlapping placements within this
    /// timetable.
    TeacherSelfConflict,
    /// A subject exceeds the daily lesson maximum.
    SubjectDailyCap,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ViolationKind::Completeness => "COMPLETENESS",
            ViolationKind::SlotAlignment => "SLOT_ALIGNMENT",
            ViolationKind::DoubleBooking => "DOUBLE_BOOKING",
            ViolationKind::TeacherAvailability => "TEACHER_AVAILABILITY",
            ViolationKind::TeacherSelfConflict => "TEACHER_SELF_CONFLICT",
            ViolationKind::SubjectDailyCap => "SUBJECT_DAILY_CAP",
        };
        write!(f, "{s}")
    }
}

/// One failed check: kind, human-readable reason, offending placements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
    pub placements: Vec<LessonPlacement>,
}

impl Violation {
    fn new(kind: ViolationKind, message: String, placements: Vec<LessonPlacement>) -> Self {
        Self {
            kind,
            message,
            placements,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

// ==========================================
// ScheduleValidator
// ==========================================
pub struct ScheduleValidator {
    config: SchedulingConfig,
}

impl ScheduleValidator {
    pub fn new(config: SchedulingConfig) -> Self {
        Self { config }
    }

    /// Run all checks. An empty result means the candidate is accepted.
    pub fn validate(
        &self,
        timetable: &Timetable,
        template: &ClassScheduleTemplate,
        assignments: &[Assignment],
        constraints: &TeacherConstraintSet,
    ) -> Vec<Violation> {
        let grid = TimeGrid::build(template, self.config.lesson_duration_minutes);
        let mut violations = Vec::new();

        self.check_completeness(timetable, assignments, &mut violations);
        self.check_slot_alignment(timetable, &grid, &mut violations);
        self.check_double_booking(timetable, &mut violations);
        self.check_teacher_availability(timetable, constraints, &mut violations);
        self.check_teacher_self_conflict(timetable, &mut violations);
        self.check_subject_daily_cap(timetable, &mut violations);

        if violations.is_empty() {
            debug!(
                class_id = template.class_id,
                placements = timetable.len(),
                "candidate timetable accepted"
            );
        } else {
            info!(
                class_id = template.class_id,
                violations = violations.len(),
                "candidate timetable rejected"
            );
        }

        violations
    }

    /// Check 1: total count and per-subject counts match the assignments
    /// exactly, not more, not less.
    fn check_completeness(
        &self,
        timetable: &Timetable,
        assignments: &[Assignment],
        violations: &mut Vec<Violation>,
    ) {
        let required = required_lessons(assignments);
        if timetable.len() != required {
            violations.push(Violation::new(
                ViolationKind::Completeness,
                format!(
                    "timetable holds {} lessons but the assignments require {}",
                    timetable.len(),
                    required
                ),
                vec![],
            ));
        }

        let mut per_subject: HashMap<SubjectId, u32> = HashMap::new();
        for placement in timetable {
            *per_subject.entry(placement.subject_id).or_insert(0) += 1;
        }
        for assignment in assignments {
            let actual = per_subject
                .remove(&assignment.subject_id)
                .unwrap_or(0);
            if actual != assignment.weekly_lessons {
                violations.push(Violation::new(
                    ViolationKind::Completeness,
                    format!(
                        "subject {} holds {} lessons but requires {}",
                        assignment.subject_id, actual, assignment.weekly_lessons
                    ),
                    vec![],
                ));
            }
        }
        // Whatever is left was never assigned to this class.
        let mut unassigned: Vec<SubjectId> = per_subject.into_keys().collect();
        unassigned.sort_unstable();
        for subject_id in unassigned {
            violations.push(Violation::new(
                ViolationKind::Completeness,
                format!("subject {subject_id} appears in the timetable but has no assignment"),
                timetable
                    .iter()
                    .filter(|p| p.subject_id == subject_id)
                    .cloned()
                    .collect(),
            ));
        }
    }

    /// Check 2: every placement window equals one grid slot exactly (right
    /// duration, never inside a break).
    fn check_slot_alignment(
        &self,
        timetable: &Timetable,
        grid: &TimeGrid,
        violations: &mut Vec<Violation>,
    ) {
        for placement in timetable {
            if grid.slot_matching(&placement.window()).is_none() {
                violations.push(Violation::new(
                    ViolationKind::SlotAlignment,
                    format!("{placement} does not match any lesson slot"),
                    vec![placement.clone()],
                ));
            }
        }
    }

    /// Check 3: no two placements share a (weekday, slot).
    fn check_double_booking(&self, timetable: &Timetable, violations: &mut Vec<Violation>) {
        let mut by_cell: HashMap<(Weekday, chrono::NaiveTime), Vec<&LessonPlacement>> =
            HashMap::new();
        for placement in timetable {
            by_cell
                .entry((placement.weekday, placement.start))
                .or_default()
                .push(placement);
        }
        let mut cells: Vec<_> = by_cell.into_iter().collect();
        cells.sort_by_key(|((weekday, start), _)| (*weekday, *start));
        for ((weekday, start), group) in cells {
            if group.len() > 1 {
                violations.push(Violation::new(
                    ViolationKind::DoubleBooking,
                    format!(
                        "{} placements share the {} {} slot",
                        group.len(),
                        weekday,
                        start.format("%H:%M")
                    ),
                    group.into_iter().cloned().collect(),
                ));
            }
        }
    }

    /// Check 4: every placement honors the external exclusions (commitments
    /// and cross-class lessons), re-checked against current data.
    fn check_teacher_availability(
        &self,
        timetable: &Timetable,
        constraints: &TeacherConstraintSet,
        violations: &mut Vec<Violation>,
    ) {
        let model = ConstraintModel::from_constraints(constraints, self.config.subject_daily_cap);
        for placement in timetable {
            if !model.is_teacher_free(placement.teacher_id, placement.weekday, &placement.window())
            {
                violations.push(Violation::new(
                    ViolationKind::TeacherAvailability,
                    format!("{placement} conflicts with the teacher's other obligations"),
                    vec![placement.clone()],
                ));
            }
        }
    }

    /// Check 5: no teacher holds two overlapping placements within this
    /// timetable.
    fn check_teacher_self_conflict(&self, timetable: &Timetable, violations: &mut Vec<Violation>) {
        let placements = timetable.placements();
        for (i, a) in placements.iter().enumerate() {
            for b in placements.iter().skip(i + 1) {
                if a.teacher_id == b.teacher_id
                    && a.weekday == b.weekday
                    && a.window().overlaps(&b.window())
                {
                    violations.push(Violation::new(
                        ViolationKind::TeacherSelfConflict,
                        format!("teacher {} is double-booked: {} vs {}", a.teacher_id, a, b),
                        vec![a.clone(), b.clone()],
                    ));
                }
            }
        }
    }

    /// Check 6: no subject exceeds the daily maximum.
    fn check_subject_daily_cap(&self, timetable: &Timetable, violations: &mut Vec<Violation>) {
        let mut per_subject_day: HashMap<(SubjectId, Weekday), Vec<&LessonPlacement>> =
            HashMap::new();
        for placement in timetable {
            per_subject_day
                .entry((placement.subject_id, placement.weekday))
                .or_default()
                .push(placement);
        }
        let mut groups: Vec<_> = per_subject_day.into_iter().collect();
        groups.sort_by_key(|((subject_id, weekday), _)| (*subject_id, *weekday));
        for ((subject_id, weekday), group) in groups {
            if group.len() as u32 > self.config.subject_daily_cap {
                violations.push(Violation::new(
                    ViolationKind::SubjectDailyCap,
                    format!(
                        "subject {} holds {} lessons on {} (maximum {})",
                        subject_id,
                        group.len(),
                        weekday,
                        self.config.subject_daily_cap
                    ),
                    group.into_iter().cloned().collect(),
                ));
            }
        }
    }
}
