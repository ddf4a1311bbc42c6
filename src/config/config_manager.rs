// ==========================================
// School Timetable Scheduling - configuration manager
// ==========================================
// Responsibility: load and override scheduling parameters.
// Storage: config_kv table (key-value, global scope).
// ==========================================

use crate::config::SchedulingConfig;
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

const KEY_LESSON_DURATION: &str = "scheduling/lesson_duration_minutes";
const KEY_SUBJECT_DAILY_CAP: &str = "scheduling/subject_daily_cap";
const KEY_BACKTRACK_BUDGET: &str = "scheduling/backtrack_budget_per_unit";

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Open a new connection against `db_path`.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Share an existing connection. The unified PRAGMA set is re-applied so
    /// connection behavior stays consistent (idempotent).
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let guard = conn.lock().map_err(|e| format!("lock poisoned: {e}"))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    /// Read one global-scope configuration value.
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("lock poisoned: {e}"))?;
        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// Write (insert or replace) one global-scope configuration value.
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("lock poisoned: {e}"))?;
        conn.execute(
            r#"INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
               ON CONFLICT (scope_id, key) DO UPDATE SET value = excluded.value,
                   updated_at = datetime('now')"#,
            params![key, value],
        )?;
        Ok(())
    }

    /// The effective scheduling configuration: code defaults overridden by
    /// whatever the config_kv table carries. Unparsable stored values fall
    /// back to the default with a warning rather than failing generation.
    pub fn scheduling_config(&self) -> Result<SchedulingConfig, Box<dyn Error>> {
        let defaults = SchedulingConfig::default();
        Ok(SchedulingConfig {
            lesson_duration_minutes: self
                .parsed_or(KEY_LESSON_DURATION, defaults.lesson_duration_minutes)?,
            subject_daily_cap: self.parsed_or(KEY_SUBJECT_DAILY_CAP, defaults.subject_daily_cap)?,
            backtrack_budget_per_unit: self
                .parsed_or(KEY_BACKTRACK_BUDGET, defaults.backtrack_budget_per_unit)?,
        })
    }

    fn parsed_or<T: FromStr + Copy>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>> {
        match self.get_global_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    warn!(key = %key, raw = %raw, "unparsable config value, using default");
                    Ok(default)
                }
            },
        }
    }
}
