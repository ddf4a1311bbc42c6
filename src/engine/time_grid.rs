// ==========================================
// School Timetable Scheduling - time grid
// ==========================================
// Responsibility: the ordered fixed-duration lesson slots of a class day.
// Input: class schedule template + lesson duration
// Output: slot list, identical across all five weekdays
// ==========================================

use crate::domain::{ClassScheduleTemplate, TimeRange, Weekday};
use tracing::debug;

/// One lesson slot within the class day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonSlot {
    /// Position within the day, 0-based.
    pub index: usize,
    pub window: TimeRange,
}

// ==========================================
// TimeGrid
// ==========================================
// The template is day-invariant, so one slot list serves Monday to Friday.
#[derive(Debug, Clone)]
pub struct TimeGrid {
    slots: Vec<LessonSlot>,
}

impl TimeGrid {
    /// Walk the class day in lesson-duration steps.
    ///
    /// A candidate slot is accepted only if it does not intersect any break
    /// window and ends at or before day end. On break overlap the cursor
    /// jumps to that break's end and slotting resumes there; a trailing
    /// remainder shorter than one lesson is dropped.
    pub fn build(template: &ClassScheduleTemplate, lesson_minutes: u32) -> Self {
        let duration = chrono::Duration::minutes(lesson_minutes as i64);
        let breaks = template.break_windows();
        let mut slots = Vec::new();
        let mut cursor = template.day_start;

        loop {
            let (end, wrapped) = cursor.overflowing_add_signed(duration);
            if wrapped != 0 || end > template.day_end {
                break;
            }
            let candidate = TimeRange::new(cursor, end);

            match breaks.iter().find(|b| b.overlaps(&candidate)) {
                Some(blocking) => {
                    // Break end is strictly after the cursor whenever the
                    // candidate overlaps it, so the walk always advances.
                    cursor = blocking.end;
                }
                None => {
                    slots.push(LessonSlot {
                        index: slots.len(),
                        window: candidate,
                    });
                    cursor = end;
                }
            }
        }

        debug!(
            class_id = template.class_id,
            class = %template.name,
            slots_per_day = slots.len(),
            lesson_minutes,
            "time grid built"
        );

        Self { slots }
    }

    pub fn slots(&self) -> &[LessonSlot] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Slots available across the school week.
    pub fn week_capacity(&self) -> usize {
        self.slots.len() * Weekday::SCHOOL_WEEK.len()
    }

    /// Exact-match lookup used by the validator: a placement is aligned only
    /// if its window equals a slot window exactly.
    pub fn slot_matching(&self, window: &TimeRange) -> Option<&LessonSlot> {
        self.slots.iter().find(|s| s.window == *window)
    }
}
