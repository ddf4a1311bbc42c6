// ==========================================
// School Timetable Scheduling - commitment repository
// ==========================================
// Read side of the appointment module: a teacher's fixed weekly obligations.
// The weekday set of a commitment is stored as a JSON array of weekday
// strings in a single column.
// ==========================================

use crate::domain::{TeacherCommitment, TeacherId, Weekday};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{range_from_db, uuid_from_db};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// CommitmentRepository
// ==========================================
pub struct CommitmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CommitmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// All commitments of the given teachers, ordered by row id for
    /// reproducible snapshots.
    pub fn find_by_teachers(
        &self,
        teacher_ids: &[TeacherId],
    ) -> RepositoryResult<Vec<TeacherCommitment>> {
        if teacher_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let placeholders = vec!["?"; teacher_ids.len()].join(", ");
        let sql = format!(
            r#"SELECT teacher_id, location, weekdays, start_time, end_time
               FROM teacher_commitment
               WHERE teacher_id IN ({placeholders})
               ORDER BY commitment_id"#
        );
        let mut stmt = conn.prepare(&sql)?;

        let values: Vec<Value> = teacher_ids
            .iter()
            .map(|id| Value::Text(id.to_string()))
            .collect();
        let rows = stmt.query_map(params_from_iter(values), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut commitments = Vec::new();
        for row in rows {
            let (teacher_raw, location, weekdays_raw, start, end) = row?;
            commitments.push(TeacherCommitment {
                teacher_id: uuid_from_db("teacher_commitment.teacher_id", &teacher_raw)?,
                location,
                weekdays: decode_weekdays(&weekdays_raw)?,
                window: range_from_db("teacher_commitment.window", &start, &end)?,
            });
        }
        Ok(commitments)
    }
}

/// Decode the JSON weekday array; unknown day names are data corruption, not
/// silently skipped.
fn decode_weekdays(raw: &str) -> RepositoryResult<Vec<Weekday>> {
    let names: Vec<String> =
        serde_json::from_str(raw).map_err(|e| RepositoryError::DataIntegrity {
            field: "teacher_commitment.weekdays".to_string(),
            message: format!("bad weekday list '{raw}': {e}"),
        })?;
    names
        .iter()
        .map(|name| {
            Weekday::from_db_str(name).ok_or_else(|| RepositoryError::DataIntegrity {
                field: "teacher_commitment.weekdays".to_string(),
                message: format!("unknown weekday '{name}'"),
            })
        })
        .collect()
}
