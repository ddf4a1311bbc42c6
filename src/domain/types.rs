// ==========================================
// School Timetable Scheduling - shared domain types
// ==========================================
// Serialization format: SCREAMING_SNAKE_CASE (matches database strings)
// ==========================================

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Class identifier (database row id).
pub type ClassId = i64;

/// Subject identifier (database row id).
pub type SubjectId = i64;

/// Teacher identifier. Teachers are user accounts in the host system and are
/// keyed by UUID.
pub type TeacherId = uuid::Uuid;

// ==========================================
// Weekday
// ==========================================
// Timetables cover the five school days only; weekends never carry lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// The school week in timetable order.
    pub const SCHOOL_WEEK: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Parse a weekday from its database string.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "MONDAY" => Some(Weekday::Monday),
            "TUESDAY" => Some(Weekday::Tuesday),
            "WEDNESDAY" => Some(Weekday::Wednesday),
            "THURSDAY" => Some(Weekday::Thursday),
            "FRIDAY" => Some(Weekday::Friday),
            _ => None,
        }
    }

    /// String stored in the database.
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "MONDAY",
            Weekday::Tuesday => "TUESDAY",
            Weekday::Wednesday => "WEDNESDAY",
            Weekday::Thursday => "THURSDAY",
            Weekday::Friday => "FRIDAY",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// Class kind
// ==========================================
// Partial-day classes carry one short break; full-day classes additionally
// carry a lunch window and a second short break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassKind {
    Partial,
    Full,
}

impl ClassKind {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PARTIAL" => Some(ClassKind::Partial),
            "FULL" => Some(ClassKind::Full),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            ClassKind::Partial => "PARTIAL",
            ClassKind::Full => "FULL",
        }
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// Placement origin
// ==========================================
// A placement is either produced by the scheduler or entered by hand. Plain
// tagged field on the placement, stored as the `generated` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacementOrigin {
    Generated,
    Manual,
}

impl PlacementOrigin {
    pub fn is_generated(&self) -> bool {
        matches!(self, PlacementOrigin::Generated)
    }
}

impl fmt::Display for PlacementOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementOrigin::Generated => write!(f, "GENERATED"),
            PlacementOrigin::Manual => write!(f, "MANUAL"),
        }
    }
}

// ==========================================
// TimeRange
// ==========================================
// Half-open interval [start, end). All overlap reasoning in the crate goes
// through `overlaps` so the semantics stay in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Half-open overlap: two ranges conflict iff
    /// `start_a < end_b && start_b < end_a`.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True iff `other` lies entirely within this range.
    pub fn contains(&self, other: &TimeRange) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_half_open_overlap() {
        let a = TimeRange::new(t(7, 0), t(7, 50));
        let b = TimeRange::new(t(7, 50), t(8, 40));
        // Touching ranges do not overlap.
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));

        let c = TimeRange::new(t(7, 30), t(8, 0));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_weekday_db_round_trip() {
        for day in Weekday::SCHOOL_WEEK {
            assert_eq!(Weekday::from_db_str(day.to_db_str()), Some(day));
        }
        assert_eq!(Weekday::from_db_str("SATURDAY"), None);
    }

    #[test]
    fn test_class_kind_parse_is_case_insensitive() {
        assert_eq!(ClassKind::from_db_str("full"), Some(ClassKind::Full));
        assert_eq!(ClassKind::from_db_str("Partial"), Some(ClassKind::Partial));
        assert_eq!(ClassKind::from_db_str("HYBRID"), None);
    }
}
