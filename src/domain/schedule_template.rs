// ==========================================
// School Timetable Scheduling - class schedule template
// ==========================================
// Responsibility: the daily time frame of one class (open/close times and
// break windows). Day-invariant: the same frame applies Monday to Friday.
// ==========================================

use crate::domain::types::{ClassId, ClassKind, TimeRange};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Template construction errors. Templates are validated once, at the edge
/// where they enter the system; every consumer downstream may assume the
/// invariants hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("day start {start} is not before day end {end}")]
    InvalidDayBounds { start: NaiveTime, end: NaiveTime },

    #[error("{label} window {window} is empty or reversed")]
    EmptyWindow { label: &'static str, window: TimeRange },

    #[error("{label} window {window} leaves the class day {day}")]
    WindowOutOfBounds {
        label: &'static str,
        window: TimeRange,
        day: TimeRange,
    },

    #[error("break windows {first} and {second} overlap or are out of order")]
    WindowsOutOfOrder { first: TimeRange, second: TimeRange },

    #[error("{kind} class is missing its {label} window")]
    MissingWindow { kind: ClassKind, label: &'static str },

    #[error("{kind} class must not carry a {label} window")]
    UnexpectedWindow { kind: ClassKind, label: &'static str },
}

// ==========================================
// ClassScheduleTemplate
// ==========================================
// Invariants (enforced by `new`):
// - day_start < day_end
// - every window is non-empty and contained in [day_start, day_end)
// - windows are ordered and pairwise disjoint
// - Full carries lunch + second break, Partial carries neither
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassScheduleTemplate {
    pub class_id: ClassId,
    pub name: String,
    pub kind: ClassKind,
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub first_break: TimeRange,
    pub lunch: Option<TimeRange>,
    pub second_break: Option<TimeRange>,
}

impl ClassScheduleTemplate {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        class_id: ClassId,
        name: impl Into<String>,
        kind: ClassKind,
        day_start: NaiveTime,
        day_end: NaiveTime,
        first_break: TimeRange,
        lunch: Option<TimeRange>,
        second_break: Option<TimeRange>,
    ) -> Result<Self, TemplateError> {
        if day_start >= day_end {
            return Err(TemplateError::InvalidDayBounds {
                start: day_start,
                end: day_end,
            });
        }

        match kind {
            ClassKind::Full => {
                if lunch.is_none() {
                    return Err(TemplateError::MissingWindow {
                        kind,
                        label: "lunch",
                    });
                }
                if second_break.is_none() {
                    return Err(TemplateError::MissingWindow {
                        kind,
                        label: "second break",
                    });
                }
            }
            ClassKind::Partial => {
                if lunch.is_some() {
                    return Err(TemplateError::UnexpectedWindow {
                        kind,
                        label: "lunch",
                    });
                }
                if second_break.is_some() {
                    return Err(TemplateError::UnexpectedWindow {
                        kind,
                        label: "second break",
                    });
                }
            }
        }

        let template = Self {
            class_id,
            name: name.into(),
            kind,
            day_start,
            day_end,
            first_break,
            lunch,
            second_break,
        };

        let day = TimeRange::new(day_start, day_end);
        let labels: [(&'static str, Option<TimeRange>); 3] = [
            ("first break", Some(first_break)),
            ("lunch", lunch),
            ("second break", second_break),
        ];
        for (label, window) in labels.into_iter() {
            let Some(window) = window else { continue };
            if !window.is_well_formed() {
                return Err(TemplateError::EmptyWindow { label, window });
            }
            if !day.contains(&window) {
                return Err(TemplateError::WindowOutOfBounds { label, window, day });
            }
        }

        let windows = template.break_windows();
        for pair in windows.windows(2) {
            // Ordered and disjoint: the next window must start at or after
            // the previous one ends.
            if pair[1].start < pair[0].end {
                return Err(TemplateError::WindowsOutOfOrder {
                    first: pair[0],
                    second: pair[1],
                });
            }
        }

        Ok(template)
    }

    /// The break windows that apply to this class, in time order.
    pub fn break_windows(&self) -> Vec<TimeRange> {
        let mut windows = vec![self.first_break];
        if let Some(lunch) = self.lunch {
            windows.push(lunch);
        }
        if let Some(second) = self.second_break {
            windows.push(second);
        }
        windows.sort_by_key(|w| w.start);
        windows
    }

    /// The full class day as a range.
    pub fn day(&self) -> TimeRange {
        TimeRange::new(self.day_start, self.day_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn r(sh: u32, sm: u32, eh: u32, em: u32) -> TimeRange {
        TimeRange::new(t(sh, sm), t(eh, em))
    }

    #[test]
    fn test_partial_template_accepts_single_break() {
        let template = ClassScheduleTemplate::new(
            1,
            "6A",
            ClassKind::Partial,
            t(7, 0),
            t(12, 0),
            r(9, 0, 9, 20),
            None,
            None,
        )
        .unwrap();
        assert_eq!(template.break_windows(), vec![r(9, 0, 9, 20)]);
    }

    #[test]
    fn test_partial_template_rejects_lunch() {
        let err = ClassScheduleTemplate::new(
            1,
            "6A",
            ClassKind::Partial,
            t(7, 0),
            t(12, 0),
            r(9, 0, 9, 20),
            Some(r(12, 0, 13, 0)),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TemplateError::UnexpectedWindow { .. }));
    }

    #[test]
    fn test_full_template_requires_lunch_and_second_break() {
        let err = ClassScheduleTemplate::new(
            2,
            "1B",
            ClassKind::Full,
            t(7, 0),
            t(16, 10),
            r(9, 30, 9, 50),
            Some(r(12, 0, 13, 0)),
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TemplateError::MissingWindow {
                label: "second break",
                ..
            }
        ));
    }

    #[test]
    fn test_full_template_orders_windows() {
        let template = ClassScheduleTemplate::new(
            2,
            "1B",
            ClassKind::Full,
            t(7, 0),
            t(16, 10),
            r(9, 30, 9, 50),
            Some(r(12, 0, 13, 0)),
            Some(r(14, 40, 15, 0)),
        )
        .unwrap();
        assert_eq!(
            template.break_windows(),
            vec![r(9, 30, 9, 50), r(12, 0, 13, 0), r(14, 40, 15, 0)]
        );
    }

    #[test]
    fn test_overlapping_windows_rejected() {
        let err = ClassScheduleTemplate::new(
            2,
            "1B",
            ClassKind::Full,
            t(7, 0),
            t(16, 10),
            r(9, 30, 9, 50),
            Some(r(9, 40, 10, 40)),
            Some(r(14, 40, 15, 0)),
        )
        .unwrap_err();
        assert!(matches!(err, TemplateError::WindowsOutOfOrder { .. }));
    }

    #[test]
    fn test_window_outside_day_rejected() {
        let err = ClassScheduleTemplate::new(
            1,
            "6A",
            ClassKind::Partial,
            t(7, 0),
            t(12, 0),
            r(11, 50, 12, 10),
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TemplateError::WindowOutOfBounds { .. }));
    }
}
