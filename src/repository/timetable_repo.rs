// ==========================================
// School Timetable Scheduling - timetable repository
// ==========================================
// The one read-write aggregate. A class's placement set is only ever
// replaced or cleared as a whole, inside one transaction together with the
// generated-timetable flag, so a concurrent reader never observes a
// partially written timetable.
// ==========================================

use crate::domain::{
    ClassId, ExistingLessonPlacement, LessonPlacement, PlacementOrigin, TeacherId, TimeRange,
    Timetable,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{time_from_db, time_to_db, uuid_from_db, weekday_from_db};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

// ==========================================
// TimetableRepository
// ==========================================
pub struct TimetableRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TimetableRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Load the stored timetable of one class (empty if none).
    pub fn find_by_class(&self, class_id: ClassId) -> RepositoryResult<Timetable> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT subject_id, teacher_id, weekday, start_time, end_time, generated
               FROM lesson_placement
               WHERE class_id = ?1
               ORDER BY placement_id"#,
        )?;

        let rows = stmt.query_map(params![class_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })?;

        let mut placements = Vec::new();
        for row in rows {
            let (subject_id, teacher_raw, weekday_raw, start, end, generated) = row?;
            placements.push(LessonPlacement {
                subject_id,
                teacher_id: uuid_from_db("lesson_placement.teacher_id", &teacher_raw)?,
                weekday: weekday_from_db("lesson_placement.weekday", &weekday_raw)?,
                start: time_from_db("lesson_placement.start_time", &start)?,
                end: time_from_db("lesson_placement.end_time", &end)?,
                origin: if generated != 0 {
                    PlacementOrigin::Generated
                } else {
                    PlacementOrigin::Manual
                },
            });
        }
        Ok(Timetable::from_placements(placements))
    }

    /// Lessons the given teachers already hold in classes other than
    /// `exclude_class` - the cross-class half of a constraint snapshot.
    pub fn find_for_teachers_excluding_class(
        &self,
        teacher_ids: &[TeacherId],
        exclude_class: ClassId,
    ) -> RepositoryResult<Vec<ExistingLessonPlacement>> {
        if teacher_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let placeholders = vec!["?"; teacher_ids.len()].join(", ");
        let sql = format!(
            r#"SELECT teacher_id, class_id, weekday, start_time, end_time
               FROM lesson_placement
               WHERE class_id != ? AND teacher_id IN ({placeholders})
               ORDER BY placement_id"#
        );
        let mut stmt = conn.prepare(&sql)?;

        let mut values: Vec<Value> = vec![Value::Integer(exclude_class)];
        values.extend(teacher_ids.iter().map(|id| Value::Text(id.to_string())));

        let rows = stmt.query_map(params_from_iter(values), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut placements = Vec::new();
        for row in rows {
            let (teacher_raw, class_id, weekday_raw, start, end) = row?;
            placements.push(ExistingLessonPlacement {
                teacher_id: uuid_from_db("lesson_placement.teacher_id", &teacher_raw)?,
                class_id,
                weekday: weekday_from_db("lesson_placement.weekday", &weekday_raw)?,
                window: TimeRange::new(
                    time_from_db("lesson_placement.start_time", &start)?,
                    time_from_db("lesson_placement.end_time", &end)?,
                ),
            });
        }
        Ok(placements)
    }

    /// Atomic replace: delete the class's previous placements, insert the
    /// new set, and raise the generated-timetable flag, all in one
    /// transaction.
    pub fn replace_for_class(
        &self,
        class_id: ClassId,
        timetable: &Timetable,
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM lesson_placement WHERE class_id = ?1",
            params![class_id],
        )?;
        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO lesson_placement (
                       class_id, subject_id, teacher_id, weekday,
                       start_time, end_time, generated
                   ) VALUES (?, ?, ?, ?, ?, ?, ?)"#,
            )?;
            for placement in timetable {
                stmt.execute(params![
                    class_id,
                    placement.subject_id,
                    placement.teacher_id.to_string(),
                    placement.weekday.to_db_str(),
                    time_to_db(placement.start),
                    time_to_db(placement.end),
                    if placement.origin.is_generated() { 1 } else { 0 },
                ])?;
            }
        }
        let updated = tx.execute(
            "UPDATE school_class SET has_generated_timetable = 1 WHERE class_id = ?1",
            params![class_id],
        )?;
        if updated == 0 {
            // Rolls back the whole replacement on drop.
            return Err(RepositoryError::NotFound {
                entity: "school_class".to_string(),
                id: class_id.to_string(),
            });
        }

        tx.commit()?;
        info!(class_id, placements = timetable.len(), "timetable replaced");
        Ok(timetable.len())
    }

    /// Atomic clear: delete all placements and lower the flag.
    pub fn clear_for_class(&self, class_id: ClassId) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let deleted = tx.execute(
            "DELETE FROM lesson_placement WHERE class_id = ?1",
            params![class_id],
        )?;
        let updated = tx.execute(
            "UPDATE school_class SET has_generated_timetable = 0 WHERE class_id = ?1",
            params![class_id],
        )?;
        if updated == 0 {
            return Err(RepositoryError::NotFound {
                entity: "school_class".to_string(),
                id: class_id.to_string(),
            });
        }

        tx.commit()?;
        info!(class_id, deleted, "timetable cleared");
        Ok(deleted)
    }
}
