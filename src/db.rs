// ==========================================
// School Timetable Scheduling - SQLite connection setup
// ==========================================
// Goals:
// - unify PRAGMA behavior across every Connection::open (foreign keys must
//   be enabled per connection)
// - unify busy_timeout to avoid sporadic busy errors under concurrent writes
// - idempotent schema bootstrap shared by library, binary, and tests
// ==========================================

use rusqlite::{Connection, OptionalExtension};
use std::time::Duration;

/// Default busy timeout in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Schema version this code expects. Bumped together with `init_schema`.
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Apply the unified PRAGMA set to a connection.
///
/// foreign_keys and busy_timeout are per-connection settings and must be
/// configured on every open.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the unified configuration applied.
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Read the schema version; `None` if the table does not exist yet.
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get(0)
        })?;
    Ok(v)
}

/// Create all tables if they do not exist and record the schema version.
///
/// Times are stored as `HH:MM` text, weekdays and kinds as their
/// SCREAMING_SNAKE_CASE strings, teacher ids as UUID text.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_scope (
            scope_id TEXT PRIMARY KEY,
            scope_type TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(scope_type, scope_key)
        );

        INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
        VALUES ('global', 'GLOBAL', 'global');

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS teacher (
            teacher_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS subject (
            subject_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS school_class (
            class_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            day_start TEXT NOT NULL,
            day_end TEXT NOT NULL,
            first_break_start TEXT NOT NULL,
            first_break_end TEXT NOT NULL,
            lunch_start TEXT,
            lunch_end TEXT,
            second_break_start TEXT,
            second_break_end TEXT,
            has_generated_timetable INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS class_assignment (
            class_id INTEGER NOT NULL REFERENCES school_class(class_id) ON DELETE CASCADE,
            subject_id INTEGER NOT NULL REFERENCES subject(subject_id),
            teacher_id TEXT NOT NULL REFERENCES teacher(teacher_id),
            weekly_lessons INTEGER NOT NULL,
            PRIMARY KEY (class_id, subject_id)
        );

        CREATE TABLE IF NOT EXISTS teacher_commitment (
            commitment_id INTEGER PRIMARY KEY AUTOINCREMENT,
            teacher_id TEXT NOT NULL REFERENCES teacher(teacher_id) ON DELETE CASCADE,
            location TEXT NOT NULL,
            weekdays TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS lesson_placement (
            placement_id INTEGER PRIMARY KEY AUTOINCREMENT,
            class_id INTEGER NOT NULL REFERENCES school_class(class_id) ON DELETE CASCADE,
            subject_id INTEGER NOT NULL REFERENCES subject(subject_id),
            teacher_id TEXT NOT NULL REFERENCES teacher(teacher_id),
            weekday TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            generated INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_lesson_placement_class
            ON lesson_placement(class_id);
        CREATE INDEX IF NOT EXISTS idx_lesson_placement_teacher
            ON lesson_placement(teacher_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}
