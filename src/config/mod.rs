// ==========================================
// School Timetable Scheduling - configuration layer
// ==========================================
// Responsibility: scheduling parameters with code defaults, overridable
// through the config_kv table (global scope).
// ==========================================

pub mod config_manager;

pub use config_manager::ConfigManager;

use serde::{Deserialize, Serialize};

/// Lesson duration shared by all classes, in minutes.
pub const DEFAULT_LESSON_DURATION_MINUTES: u32 = 50;

/// Hard ceiling of lessons per subject per day.
pub const DEFAULT_SUBJECT_DAILY_CAP: u32 = 2;

/// Backtracking attempts allowed per lesson-unit before the scheduler gives
/// up and reports a partial result.
pub const DEFAULT_BACKTRACK_BUDGET_PER_UNIT: u32 = 400;

// ==========================================
// SchedulingConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    pub lesson_duration_minutes: u32,
    pub subject_daily_cap: u32,
    pub backtrack_budget_per_unit: u32,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            lesson_duration_minutes: DEFAULT_LESSON_DURATION_MINUTES,
            subject_daily_cap: DEFAULT_SUBJECT_DAILY_CAP,
            backtrack_budget_per_unit: DEFAULT_BACKTRACK_BUDGET_PER_UNIT,
        }
    }
}

impl SchedulingConfig {
    pub fn lesson_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.lesson_duration_minutes as i64)
    }
}
