// ==========================================
// Test helpers
// ==========================================
// Temporary database setup and seed data for integration tests.
// ==========================================
#![allow(dead_code)]

use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use uuid::Uuid;

use school_timetable::db::{configure_sqlite_connection, init_schema};

/// Create a temporary database with the full schema applied.
///
/// Returns the temp file (keep it alive for the test's duration) and the
/// database path.
pub fn create_test_db() -> (NamedTempFile, String) {
    let temp_file = NamedTempFile::new().expect("temp file");
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path).expect("open db");
    configure_sqlite_connection(&conn).expect("configure");
    init_schema(&conn).expect("schema");

    (temp_file, db_path)
}

/// Open a shared connection against a test database.
pub fn open_shared(db_path: &str) -> Arc<Mutex<Connection>> {
    let conn = school_timetable::db::open_sqlite_connection(db_path).expect("open db");
    Arc::new(Mutex::new(conn))
}

// ==========================================
// Seeders
// ==========================================

pub fn insert_teacher(conn: &Connection, id: &Uuid, name: &str) {
    conn.execute(
        "INSERT INTO teacher (teacher_id, name) VALUES (?1, ?2)",
        params![id.to_string(), name],
    )
    .expect("insert teacher");
}

pub fn insert_subject(conn: &Connection, id: i64, name: &str) {
    conn.execute(
        "INSERT INTO subject (subject_id, name) VALUES (?1, ?2)",
        params![id, name],
    )
    .expect("insert subject");
}

/// Partial-day class: one short break, no lunch, no second break.
pub fn insert_partial_class(
    conn: &Connection,
    id: i64,
    name: &str,
    day_start: &str,
    day_end: &str,
    break_start: &str,
    break_end: &str,
) {
    conn.execute(
        r#"INSERT INTO school_class
               (class_id, name, kind, day_start, day_end,
                first_break_start, first_break_end)
           VALUES (?1, ?2, 'PARTIAL', ?3, ?4, ?5, ?6)"#,
        params![id, name, day_start, day_end, break_start, break_end],
    )
    .expect("insert partial class");
}

/// Full-day class: short break + lunch + second break.
#[allow(clippy::too_many_arguments)]
pub fn insert_full_class(
    conn: &Connection,
    id: i64,
    name: &str,
    day_start: &str,
    day_end: &str,
    first_break: (&str, &str),
    lunch: (&str, &str),
    second_break: (&str, &str),
) {
    conn.execute(
        r#"INSERT INTO school_class
               (class_id, name, kind, day_start, day_end,
                first_break_start, first_break_end,
                lunch_start, lunch_end,
                second_break_start, second_break_end)
           VALUES (?1, ?2, 'FULL', ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#,
        params![
            id,
            name,
            day_start,
            day_end,
            first_break.0,
            first_break.1,
            lunch.0,
            lunch.1,
            second_break.0,
            second_break.1
        ],
    )
    .expect("insert full class");
}

pub fn insert_assignment(
    conn: &Connection,
    class_id: i64,
    subject_id: i64,
    teacher_id: &Uuid,
    weekly_lessons: u32,
) {
    conn.execute(
        r#"INSERT INTO class_assignment (class_id, subject_id, teacher_id, weekly_lessons)
           VALUES (?1, ?2, ?3, ?4)"#,
        params![class_id, subject_id, teacher_id.to_string(), weekly_lessons],
    )
    .expect("insert assignment");
}

pub fn insert_commitment(
    conn: &Connection,
    teacher_id: &Uuid,
    location: &str,
    weekdays: &[&str],
    start: &str,
    end: &str,
) {
    let weekdays_json = serde_json::to_string(weekdays).unwrap();
    conn.execute(
        r#"INSERT INTO teacher_commitment (teacher_id, location, weekdays, start_time, end_time)
           VALUES (?1, ?2, ?3, ?4, ?5)"#,
        params![teacher_id.to_string(), location, weekdays_json, start, end],
    )
    .expect("insert commitment");
}

#[allow(clippy::too_many_arguments)]
pub fn insert_placement(
    conn: &Connection,
    class_id: i64,
    subject_id: i64,
    teacher_id: &Uuid,
    weekday: &str,
    start: &str,
    end: &str,
    generated: bool,
) {
    conn.execute(
        r#"INSERT INTO lesson_placement
               (class_id, subject_id, teacher_id, weekday, start_time, end_time, generated)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
        params![
            class_id,
            subject_id,
            teacher_id.to_string(),
            weekday,
            start,
            end,
            generated as i64
        ],
    )
    .expect("insert placement");
}

/// Seed the standard generation scenario: a partial-day class with five
/// 50-minute slots per day (07:00-12:00, break 09:00-09:20) and six subjects
/// that exactly fill the 25-slot week. Returns the teacher id per subject,
/// indexed by subject id 1..=6.
pub fn seed_standard_class(conn: &Connection, class_id: i64) -> Vec<(i64, Uuid, u32)> {
    insert_partial_class(
        conn,
        class_id,
        &format!("Class {class_id}"),
        "07:00",
        "12:00",
        "09:00",
        "09:20",
    );

    let subjects = [
        (1, "Portuguese", 5u32),
        (2, "Mathematics", 5),
        (3, "Science", 4),
        (4, "History", 4),
        (5, "Geography", 4),
        (6, "Arts", 3),
    ];

    let mut seeded = Vec::new();
    for (subject_id, subject_name, weekly) in subjects {
        let teacher = Uuid::new_v4();
        insert_teacher(conn, &teacher, &format!("{subject_name} teacher"));
        // Subject ids are namespaced per class so several seeded classes can
        // share one database file.
        let unique_subject_id = (class_id - 1) * 10 + subject_id;
        insert_subject(conn, unique_subject_id, &format!("{subject_name} {class_id}"));
        insert_assignment(conn, class_id, unique_subject_id, &teacher, weekly);
        seeded.push((unique_subject_id, teacher, weekly));
    }
    seeded
}
