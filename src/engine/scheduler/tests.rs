use super::*;
use crate::config::SchedulingConfig;
use crate::domain::{
    Assignment, ClassKind, ClassScheduleTemplate, TeacherCommitment, TeacherConstraintSet,
    TimeRange, Weekday,
};
use crate::engine::error::{SchedulerError, UnplacedReason};
use chrono::NaiveTime;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

// ==========================================
// Test helpers
// ==========================================

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn r(sh: u32, sm: u32, eh: u32, em: u32) -> TimeRange {
    TimeRange::new(t(sh, sm), t(eh, em))
}

/// Partial-day class, 5 slots per day, 25 per week.
fn five_slot_template() -> ClassScheduleTemplate {
    ClassScheduleTemplate::new(
        1,
        "6A",
        ClassKind::Partial,
        t(7, 0),
        t(12, 0),
        r(9, 0, 9, 20),
        None,
        None,
    )
    .unwrap()
}

/// Partial-day class, 2 slots per day, 10 per week.
fn two_slot_template() -> ClassScheduleTemplate {
    ClassScheduleTemplate::new(
        2,
        "7B",
        ClassKind::Partial,
        t(7, 0),
        t(9, 30),
        r(8, 40, 8, 50),
        None,
        None,
    )
    .unwrap()
}

/// Partial-day class, 3 slots per day, 15 per week.
fn three_slot_template() -> ClassScheduleTemplate {
    ClassScheduleTemplate::new(
        3,
        "8C",
        ClassKind::Partial,
        t(7, 0),
        t(10, 20),
        r(8, 40, 8, 50),
        None,
        None,
    )
    .unwrap()
}

/// Six-subject load that exactly fills the five-slot week, one teacher per
/// subject.
fn full_week_assignments() -> Vec<Assignment> {
    let counts = [5, 5, 4, 4, 4, 3];
    counts
        .iter()
        .enumerate()
        .map(|(i, &n)| Assignment::new(i as i64 + 1, Uuid::new_v4(), n))
        .collect()
}

fn scheduler() -> Scheduler {
    Scheduler::new(SchedulingConfig::default())
}

// ==========================================
// Input checks
// ==========================================

#[test]
fn test_empty_assignments_rejected() {
    let err = scheduler()
        .generate(
            &five_slot_template(),
            &[],
            &TeacherConstraintSet::default(),
        )
        .unwrap_err();
    assert_eq!(err, SchedulerError::EmptyAssignments);
}

#[test]
fn test_duplicate_subject_rejected() {
    let teacher = Uuid::new_v4();
    let assignments = vec![
        Assignment::new(1, teacher, 13),
        Assignment::new(1, teacher, 12),
    ];
    let err = scheduler()
        .generate(
            &five_slot_template(),
            &assignments,
            &TeacherConstraintSet::default(),
        )
        .unwrap_err();
    assert_eq!(err, SchedulerError::DuplicateSubject { subject_id: 1 });
}

#[test]
fn test_zero_lesson_assignment_rejected() {
    let assignments = vec![Assignment::new(1, Uuid::new_v4(), 0)];
    let err = scheduler()
        .generate(
            &five_slot_template(),
            &assignments,
            &TeacherConstraintSet::default(),
        )
        .unwrap_err();
    assert_eq!(err, SchedulerError::ZeroLessonAssignment { subject_id: 1 });
}

#[test]
fn test_capacity_mismatch_reports_both_numbers() {
    // 26 lessons against 25 slots: fail fast, no placement attempted.
    let mut assignments = full_week_assignments();
    assignments[0].weekly_lessons += 1;
    let err = scheduler()
        .generate(
            &five_slot_template(),
            &assignments,
            &TeacherConstraintSet::default(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        SchedulerError::CapacityMismatch {
            required: 26,
            available: 25
        }
    );
}

// ==========================================
// Successful generation
// ==========================================

#[test]
fn test_generates_complete_timetable() {
    let assignments = full_week_assignments();
    let timetable = scheduler()
        .generate(
            &five_slot_template(),
            &assignments,
            &TeacherConstraintSet::default(),
        )
        .unwrap();

    assert_eq!(timetable.len(), 25);

    // Every subject holds exactly its weekly count.
    let mut per_subject: HashMap<i64, u32> = HashMap::new();
    for placement in &timetable {
        *per_subject.entry(placement.subject_id).or_insert(0) += 1;
    }
    for assignment in &assignments {
        assert_eq!(per_subject[&assignment.subject_id], assignment.weekly_lessons);
    }
}

#[test]
fn test_no_cell_used_twice() {
    let timetable = scheduler()
        .generate(
            &five_slot_template(),
            &full_week_assignments(),
            &TeacherConstraintSet::default(),
        )
        .unwrap();

    let mut seen = HashSet::new();
    for placement in &timetable {
        assert!(
            seen.insert((placement.weekday, placement.start)),
            "cell {} {} used twice",
            placement.weekday,
            placement.start
        );
    }
}

#[test]
fn test_subject_daily_cap_respected() {
    let timetable = scheduler()
        .generate(
            &five_slot_template(),
            &full_week_assignments(),
            &TeacherConstraintSet::default(),
        )
        .unwrap();

    let mut per_subject_day: HashMap<(i64, Weekday), u32> = HashMap::new();
    for placement in &timetable {
        *per_subject_day
            .entry((placement.subject_id, placement.weekday))
            .or_insert(0) += 1;
    }
    assert!(per_subject_day.values().all(|&count| count <= 2));
}

#[test]
fn test_deterministic_output() {
    let assignments = full_week_assignments();
    let constraints = TeacherConstraintSet::default();
    let template = five_slot_template();

    let first = scheduler()
        .generate(&template, &assignments, &constraints)
        .unwrap();
    let second = scheduler()
        .generate(&template, &assignments, &constraints)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_commitment_blocks_placement() {
    let mut assignments = full_week_assignments();
    let busy_teacher = assignments[0].teacher_id;
    // The teacher of subject 1 is away every Monday morning.
    let constraints = TeacherConstraintSet::new(
        vec![TeacherCommitment {
            teacher_id: busy_teacher,
            location: "University".to_string(),
            weekdays: vec![Weekday::Monday],
            window: r(7, 0, 10, 0),
        }],
        vec![],
    );
    // Keep the instance feasible: subject 1 needs only 4 lessons now, the
    // spare slot goes to subject 6.
    assignments[0].weekly_lessons = 4;
    assignments[5].weekly_lessons = 4;

    let timetable = scheduler()
        .generate(&five_slot_template(), &assignments, &constraints)
        .unwrap();

    for placement in timetable
        .iter()
        .filter(|p| p.teacher_id == busy_teacher && p.weekday == Weekday::Monday)
    {
        assert!(
            placement.start >= t(10, 0),
            "placement {} overlaps the commitment",
            placement
        );
    }
}

#[test]
fn test_teacher_days_are_clustered() {
    // Subject 1 has 5 lessons; with a 2-per-day cap the tightest packing is
    // 2+2+1 over three days. The clustering preference must reach it.
    let assignments = full_week_assignments();
    let teacher = assignments[0].teacher_id;
    let timetable = scheduler()
        .generate(
            &five_slot_template(),
            &assignments,
            &TeacherConstraintSet::default(),
        )
        .unwrap();

    let days: HashSet<Weekday> = timetable
        .iter()
        .filter(|p| p.teacher_id == teacher)
        .map(|p| p.weekday)
        .collect();
    assert_eq!(days.len(), 3);
}

// ==========================================
// Partial failure
// ==========================================

#[test]
fn test_partial_failure_on_teacher_conflict() {
    // One teacher carries the whole 10-slot week but is committed during the
    // first slot of every day: only 5 lessons can land.
    let teacher = Uuid::new_v4();
    let assignments = vec![
        Assignment::new(1, teacher, 5),
        Assignment::new(2, teacher, 5),
    ];
    let constraints = TeacherConstraintSet::new(
        vec![TeacherCommitment {
            teacher_id: teacher,
            location: "Clinic".to_string(),
            weekdays: Weekday::SCHOOL_WEEK.to_vec(),
            window: r(7, 0, 7, 50),
        }],
        vec![],
    );

    let err = scheduler()
        .generate(&two_slot_template(), &assignments, &constraints)
        .unwrap_err();

    let SchedulerError::PartialFailure(partial) = err else {
        panic!("expected partial failure, got {err:?}");
    };
    assert_eq!(partial.placements.len(), 5);
    assert_eq!(partial.unplaced.len(), 5);
    assert!(partial
        .unplaced
        .iter()
        .all(|u| u.reason == UnplacedReason::TeacherConflict));
}

#[test]
fn test_partial_failure_on_subject_cap() {
    // Subject 1 wants 11 lessons but the cap admits at most 2 x 5 = 10.
    let assignments = vec![
        Assignment::new(1, Uuid::new_v4(), 11),
        Assignment::new(2, Uuid::new_v4(), 4),
    ];

    let err = scheduler()
        .generate(
            &three_slot_template(),
            &assignments,
            &TeacherConstraintSet::default(),
        )
        .unwrap_err();

    let SchedulerError::PartialFailure(partial) = err else {
        panic!("expected partial failure, got {err:?}");
    };
    assert_eq!(partial.placements.len(), 14);
    assert_eq!(partial.unplaced.len(), 1);
    assert_eq!(partial.unplaced[0].subject_id, 1);
    assert_eq!(partial.unplaced[0].reason, UnplacedReason::SubjectCapReached);
}

#[test]
fn test_partial_failure_is_deterministic() {
    let teacher = Uuid::new_v4();
    let assignments = vec![
        Assignment::new(1, teacher, 5),
        Assignment::new(2, teacher, 5),
    ];
    let constraints = TeacherConstraintSet::new(
        vec![TeacherCommitment {
            teacher_id: teacher,
            location: "Clinic".to_string(),
            weekdays: Weekday::SCHOOL_WEEK.to_vec(),
            window: r(7, 0, 7, 50),
        }],
        vec![],
    );

    let run = || {
        scheduler()
            .generate(&two_slot_template(), &assignments, &constraints)
            .unwrap_err()
    };
    assert_eq!(run(), run());
}
