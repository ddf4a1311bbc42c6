// ==========================================
// School Timetable Scheduling - timetable entities
// ==========================================
// A timetable is the placement set for one class. It is held transiently
// between generation and an explicit save; nothing is written until the
// caller persists it.
// ==========================================

use crate::domain::types::{PlacementOrigin, SubjectId, TeacherId, TimeRange, Weekday};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// LessonPlacement
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonPlacement {
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub weekday: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub origin: PlacementOrigin,
}

impl LessonPlacement {
    pub fn window(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }
}

impl fmt::Display for LessonPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "subject {} / teacher {} @ {} {}",
            self.subject_id,
            self.teacher_id,
            self.weekday,
            self.window()
        )
    }
}

// ==========================================
// Timetable
// ==========================================
// Placements are kept sorted by (weekday, start, subject) so equal inputs
// produce byte-identical output. Serde is transparent over the placement
// list: an externally proposed JSON array deserializes directly into a
// candidate timetable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timetable {
    placements: Vec<LessonPlacement>,
}

impl Timetable {
    /// Build a timetable from an unordered placement list.
    pub fn from_placements(mut placements: Vec<LessonPlacement>) -> Self {
        placements.sort_by_key(|p| (p.weekday, p.start, p.subject_id));
        Self { placements }
    }

    pub fn placements(&self) -> &[LessonPlacement] {
        &self.placements
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LessonPlacement> {
        self.placements.iter()
    }

    /// Placements on one weekday, in start-time order.
    pub fn placements_for_day(
        &self,
        weekday: Weekday,
    ) -> impl Iterator<Item = &LessonPlacement> {
        self.placements.iter().filter(move |p| p.weekday == weekday)
    }

    /// All teachers appearing in this timetable, sorted and deduplicated.
    /// Drives constraint loading.
    pub fn teacher_ids(&self) -> Vec<TeacherId> {
        let mut ids: Vec<TeacherId> = self.placements.iter().map(|p| p.teacher_id).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

impl<'a> IntoIterator for &'a Timetable {
    type Item = &'a LessonPlacement;
    type IntoIter = std::slice::Iter<'a, LessonPlacement>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.iter()
    }
}
