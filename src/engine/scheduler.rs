// ==========================================
// School Timetable Scheduling - scheduler
// ==========================================
// Responsibility: place every required lesson-unit into a (weekday, slot)
// cell, or report a diagnosed failure.
// Input: schedule template + assignments + teacher constraint snapshot
// Output: complete timetable, or CapacityMismatch / PartialFailure
// ==========================================
// Determinism: identical inputs produce identical output, every run.
// ==========================================

mod core;

#[cfg(test)]
mod tests;

pub use self::core::Scheduler;
