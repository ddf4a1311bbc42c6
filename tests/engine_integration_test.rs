// ==========================================
// Engine integration tests
// ==========================================
// Scheduler + validator working together on in-memory snapshots, no
// database involved.
// ==========================================

use chrono::NaiveTime;
use std::collections::HashSet;
use uuid::Uuid;

use school_timetable::config::SchedulingConfig;
use school_timetable::domain::{
    Assignment, ClassKind, ClassScheduleTemplate, ExistingLessonPlacement, TeacherCommitment,
    TeacherConstraintSet, TimeRange, Weekday,
};
use school_timetable::engine::{
    ScheduleValidator, Scheduler, SchedulerError, ViolationKind,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn r(sh: u32, sm: u32, eh: u32, em: u32) -> TimeRange {
    TimeRange::new(t(sh, sm), t(eh, em))
}

/// Partial-day class, five 50-minute slots per day, 25 per week.
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

fn full_week_assignments() -> Vec<Assignment> {
    [5u32, 5, 4, 4, 4, 3]
        .iter()
        .enumerate()
        .map(|(i, &n)| Assignment::new(i as i64 + 1, Uuid::new_v4(), n))
        .collect()
}

fn scheduler() -> Scheduler {
    Scheduler::new(SchedulingConfig::default())
}

fn validator() -> ScheduleValidator {
    ScheduleValidator::new(SchedulingConfig::default())
}

#[test]
fn test_generated_timetable_has_zero_violations() {
    // Completeness invariant: a success result always passes the
    // independent validator.
    let template = five_slot_template();
    let assignments = full_week_assignments();
    let teacher = assignments[2].teacher_id;
    let constraints = TeacherConstraintSet::new(
        vec![TeacherCommitment {
            teacher_id: teacher,
            location: "District office".to_string(),
            weekdays: vec![Weekday::Tuesday, Weekday::Thursday],
            window: r(7, 0, 8, 40),
        }],
        vec![ExistingLessonPlacement {
            teacher_id: teacher,
            class_id: 2,
            weekday: Weekday::Monday,
            window: r(7, 0, 7, 50),
        }],
    );

    let timetable = scheduler()
        .generate(&template, &assignments, &constraints)
        .unwrap();

    assert_eq!(timetable.len(), 25);
    let violations = validator().validate(&timetable, &template, &assignments, &constraints);
    assert!(violations.is_empty(), "unexpected: {violations:?}");
}

#[test]
fn test_generation_avoids_cross_class_lessons() {
    let template = five_slot_template();
    let assignments = full_week_assignments();
    let teacher = assignments[0].teacher_id;
    // The teacher already holds Wednesday mornings in another class.
    let existing = vec![
        ExistingLessonPlacement {
            teacher_id: teacher,
            class_id: 7,
            weekday: Weekday::Wednesday,
            window: r(7, 0, 7, 50),
        },
        ExistingLessonPlacement {
            teacher_id: teacher,
            class_id: 7,
            weekday: Weekday::Wednesday,
            window: r(7, 50, 8, 40),
        },
    ];
    let constraints = TeacherConstraintSet::new(vec![], existing.clone());

    let timetable = scheduler()
        .generate(&template, &assignments, &constraints)
        .unwrap();

    for placement in timetable.iter().filter(|p| p.teacher_id == teacher) {
        for busy in &existing {
            assert!(
                placement.weekday != busy.weekday || !placement.window().overlaps(&busy.window),
                "{placement} collides with a lesson in class {}",
                busy.class_id
            );
        }
    }
}

#[test]
fn test_capacity_mismatch_reported_before_placement() {
    // 26 lessons against 25 slots.
    let mut assignments = full_week_assignments();
    assignments[5].weekly_lessons += 1;
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

#[test]
fn test_partial_result_is_conflict_free() {
    // An infeasible instance: one teacher carries both subjects of a
    // 10-slot week but is blocked during the first slot of every day. The
    // partial placements must still be free of every conflict kind; only
    // completeness may fail.
    let template = ClassScheduleTemplate::new(
        2,
        "7B",
        ClassKind::Partial,
        t(7, 0),
        t(9, 30),
        r(8, 40, 8, 50),
        None,
        None,
    )
    .unwrap();
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
        .generate(&template, &assignments, &constraints)
        .unwrap_err();
    let SchedulerError::PartialFailure(partial) = err else {
        panic!("expected partial failure, got {err:?}");
    };

    let violations =
        validator().validate(&partial.placements, &template, &assignments, &constraints);
    let kinds: HashSet<ViolationKind> = violations.iter().map(|v| v.kind).collect();
    assert_eq!(
        kinds,
        HashSet::from([ViolationKind::Completeness]),
        "partial placements must only fail completeness: {violations:?}"
    );
}

#[test]
fn test_validator_rejects_shuffled_candidate() {
    // Swap two placements onto the same cell: the validator catches what a
    // blindly trusted external proposal would have slipped through.
    let template = five_slot_template();
    let assignments = full_week_assignments();
    let constraints = TeacherConstraintSet::default();

    let timetable = scheduler()
        .generate(&template, &assignments, &constraints)
        .unwrap();

    let mut placements = timetable.placements().to_vec();
    placements[1].weekday = placements[0].weekday;
    placements[1].start = placements[0].start;
    placements[1].end = placements[0].end;
    let tampered = school_timetable::domain::Timetable::from_placements(placements);

    let violations = validator().validate(&tampered, &template, &assignments, &constraints);
    assert!(violations
        .iter()
        .any(|v| v.kind == ViolationKind::DoubleBooking));
}
