// ==========================================
// School Timetable Scheduling - class repository
// ==========================================
// Read side of the class registry: schedule templates, assignment lists,
// and the generated-timetable flag. Classes are authored elsewhere.
// ==========================================

use crate::domain::{
    Assignment, ClassId, ClassKind, ClassScheduleTemplate, TimeRange,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{range_from_db, uuid_from_db};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// Class listing row: identity plus the generated-timetable flag, for hosts
/// rendering the class overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRow {
    pub class_id: ClassId,
    pub name: String,
    pub kind: ClassKind,
    pub has_generated_timetable: bool,
}

// ==========================================
// ClassRepository
// ==========================================
pub struct ClassRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ClassRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Load the schedule template of one class.
    ///
    /// Stored window columns are re-validated through the template
    /// constructor; a row violating the template invariants surfaces as
    /// `DataIntegrity`, never as a silently broken template.
    pub fn find_template(&self, class_id: ClassId) -> RepositoryResult<ClassScheduleTemplate> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                r#"SELECT class_id, name, kind, day_start, day_end,
                          first_break_start, first_break_end,
                          lunch_start, lunch_end,
                          second_break_start, second_break_end
                   FROM school_class WHERE class_id = ?1"#,
                params![class_id],
                map_template_row,
            )
            .optional()?;

        match row {
            Some(result) => result,
            None => Err(RepositoryError::NotFound {
                entity: "school_class".to_string(),
                id: class_id.to_string(),
            }),
        }
    }

    /// Load the assignment list of one class, ordered by subject.
    pub fn find_assignments(&self, class_id: ClassId) -> RepositoryResult<Vec<Assignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT subject_id, teacher_id, weekly_lessons
               FROM class_assignment
               WHERE class_id = ?1
               ORDER BY subject_id"#,
        )?;

        let rows = stmt.query_map(params![class_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut assignments = Vec::new();
        for row in rows {
            let (subject_id, teacher_raw, weekly) = row?;
            let teacher_id = uuid_from_db("class_assignment.teacher_id", &teacher_raw)?;
            if weekly < 0 {
                return Err(RepositoryError::DataIntegrity {
                    field: "class_assignment.weekly_lessons".to_string(),
                    message: format!("negative lesson count {weekly}"),
                });
            }
            assignments.push(Assignment::new(subject_id, teacher_id, weekly as u32));
        }
        Ok(assignments)
    }

    /// Class listing row (name, kind, generated flag).
    pub fn find_row(&self, class_id: ClassId) -> RepositoryResult<ClassRow> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                r#"SELECT class_id, name, kind, has_generated_timetable
                   FROM school_class WHERE class_id = ?1"#,
                params![class_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((class_id, name, kind_raw, flag)) => Ok(ClassRow {
                class_id,
                name,
                kind: parse_kind(&kind_raw)?,
                has_generated_timetable: flag != 0,
            }),
            None => Err(RepositoryError::NotFound {
                entity: "school_class".to_string(),
                id: class_id.to_string(),
            }),
        }
    }
}

fn parse_kind(raw: &str) -> RepositoryResult<ClassKind> {
    ClassKind::from_db_str(raw).ok_or_else(|| RepositoryError::DataIntegrity {
        field: "school_class.kind".to_string(),
        message: format!("unknown class kind '{raw}'"),
    })
}

type TemplateRow = (
    i64,
    String,
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn map_template_row(row: &Row<'_>) -> rusqlite::Result<RepositoryResult<ClassScheduleTemplate>> {
    let raw: TemplateRow = (
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
    );
    Ok(build_template(raw))
}

fn build_template(raw: TemplateRow) -> RepositoryResult<ClassScheduleTemplate> {
    let (
        class_id,
        name,
        kind_raw,
        day_start,
        day_end,
        first_break_start,
        first_break_end,
        lunch_start,
        lunch_end,
        second_break_start,
        second_break_end,
    ) = raw;

    let kind = parse_kind(&kind_raw)?;
    let day = range_from_db("school_class.day", &day_start, &day_end)?;
    let first_break =
        range_from_db("school_class.first_break", &first_break_start, &first_break_end)?;
    let lunch = optional_range("school_class.lunch", lunch_start, lunch_end)?;
    let second_break = optional_range(
        "school_class.second_break",
        second_break_start,
        second_break_end,
    )?;

    ClassScheduleTemplate::new(
        class_id,
        name,
        kind,
        day.start,
        day.end,
        first_break,
        lunch,
        second_break,
    )
    .map_err(|e| RepositoryError::DataIntegrity {
        field: "school_class".to_string(),
        message: e.to_string(),
    })
}

fn optional_range(
    field: &str,
    start: Option<String>,
    end: Option<String>,
) -> RepositoryResult<Option<TimeRange>> {
    match (start, end) {
        (Some(s), Some(e)) => Ok(Some(range_from_db(field, &s, &e)?)),
        (None, None) => Ok(None),
        _ => Err(RepositoryError::DataIntegrity {
            field: field.to_string(),
            message: "window has only one of start/end".to_string(),
        }),
    }
}
