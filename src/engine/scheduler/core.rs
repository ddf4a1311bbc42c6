// ==========================================
// School Timetable Scheduling - scheduler core
// ==========================================
// Constraint-satisfaction with bounded backtracking and deterministic
// tie-breaks. The search runs sequentially on one thread: it mutates shared
// per-run state (cell occupancy, exclusion windows, subject/day counters).
// ==========================================

use crate::config::SchedulingConfig;
use crate::domain::{
    required_lessons, Assignment, ClassScheduleTemplate, LessonPlacement, PlacementOrigin,
    SubjectId, TeacherConstraintSet, TeacherId, TimeRange, Timetable, Weekday,
};
use crate::engine::constraint_model::ConstraintModel;
use crate::engine::error::{PartialSchedule, SchedulerError, UnplacedLesson, UnplacedReason};
use crate::engine::time_grid::TimeGrid;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// One (weekday, slot) cell of the weekly grid.
#[derive(Debug, Clone, Copy)]
struct Cell {
    weekday: Weekday,
    window: TimeRange,
}

/// One required occurrence of a subject's weekly lesson count.
#[derive(Debug, Clone, Copy)]
struct LessonUnit {
    subject_id: SubjectId,
    teacher_id: TeacherId,
}

// ==========================================
// Scheduler
// ==========================================
pub struct Scheduler {
    config: SchedulingConfig,
}

impl Scheduler {
    pub fn new(config: SchedulingConfig) -> Self {
        Self { config }
    }

    /// Generate a complete timetable for one class.
    ///
    /// # Preconditions
    /// - at most one assignment per subject, each with `weekly_lessons >= 1`
    /// - sum of weekly lesson counts equals the weekly slot capacity
    ///
    /// # Returns
    /// - `Ok(Timetable)`: every lesson-unit placed, zero constraint
    ///   violations by construction
    /// - `Err(CapacityMismatch)`: structurally infeasible, placement never
    ///   attempted
    /// - `Err(PartialFailure)`: search budget exhausted; carries the
    ///   best-effort subset and a reason per missing unit
    pub fn generate(
        &self,
        template: &ClassScheduleTemplate,
        assignments: &[Assignment],
        constraints: &TeacherConstraintSet,
    ) -> Result<Timetable, SchedulerError> {
        check_assignments(assignments)?;

        let grid = TimeGrid::build(template, self.config.lesson_duration_minutes);
        let required = required_lessons(assignments);
        let available = grid.week_capacity();
        if required != available {
            warn!(
                class_id = template.class_id,
                required, available, "capacity mismatch, generation not attempted"
            );
            return Err(SchedulerError::CapacityMismatch {
                required,
                available,
            });
        }

        let cells = build_cells(&grid);
        let units = build_units(assignments);
        let budget = units.len() as u64 * self.config.backtrack_budget_per_unit as u64;

        info!(
            class_id = template.class_id,
            class = %template.name,
            lesson_units = units.len(),
            slots_per_day = grid.slot_count(),
            budget,
            "starting timetable generation"
        );

        let mut search = PlacementSearch {
            cells: &cells,
            units: &units,
            model: ConstraintModel::from_constraints(constraints, self.config.subject_daily_cap),
            filled: vec![false; cells.len()],
            chosen: Vec::with_capacity(units.len()),
            attempts: 0,
            budget,
            exhausted: false,
        };

        if search.solve(0) {
            info!(
                class_id = template.class_id,
                attempts = search.attempts,
                "timetable generation complete"
            );
            return Ok(assemble(&units, &search.chosen, &cells));
        }

        warn!(
            class_id = template.class_id,
            attempts = search.attempts,
            exhausted = search.exhausted,
            "search failed, building best-effort partial placement"
        );

        let partial = self.greedy_partial(&cells, &units, constraints, search.attempts);
        Err(SchedulerError::PartialFailure(partial))
    }

    /// Best-effort first-fit pass used when the search gives up: places what
    /// fits without backtracking and diagnoses every unit left over.
    fn greedy_partial(
        &self,
        cells: &[Cell],
        units: &[LessonUnit],
        constraints: &TeacherConstraintSet,
        attempts: u64,
    ) -> PartialSchedule {
        let mut model =
            ConstraintModel::from_constraints(constraints, self.config.subject_daily_cap);
        let mut filled = vec![false; cells.len()];
        let mut placed: Vec<LessonPlacement> = Vec::new();
        let mut teacher_days: HashMap<TeacherId, HashSet<Weekday>> = HashMap::new();
        let mut unplaced = Vec::new();

        for unit in units {
            let preferred = teacher_days.get(&unit.teacher_id);
            let pick = ordered_cell_indices(cells, preferred, 0).find(|&idx| {
                !filled[idx]
                    && model.is_teacher_free(unit.teacher_id, cells[idx].weekday, &cells[idx].window)
                    && !model.subject_cap_reached(unit.subject_id, cells[idx].weekday)
            });

            match pick {
                Some(idx) => {
                    let cell = cells[idx];
                    filled[idx] = true;
                    model.record_placement(unit.subject_id, unit.teacher_id, cell.weekday, cell.window);
                    teacher_days
                        .entry(unit.teacher_id)
                        .or_default()
                        .insert(cell.weekday);
                    placed.push(LessonPlacement {
                        subject_id: unit.subject_id,
                        teacher_id: unit.teacher_id,
                        weekday: cell.weekday,
                        start: cell.window.start,
                        end: cell.window.end,
                        origin: PlacementOrigin::Generated,
                    });
                }
                None => {
                    let reason = diagnose_unplaced(unit, cells, &filled, &model);
                    debug!(
                        subject_id = unit.subject_id,
                        teacher_id = %unit.teacher_id,
                        reason = %reason,
                        "lesson-unit could not be placed"
                    );
                    unplaced.push(UnplacedLesson {
                        subject_id: unit.subject_id,
                        teacher_id: unit.teacher_id,
                        reason,
                    });
                }
            }
        }

        PartialSchedule {
            placements: Timetable::from_placements(placed),
            unplaced,
            attempts,
        }
    }
}

// ==========================================
// Depth-first search
// ==========================================
struct PlacementSearch<'a> {
    cells: &'a [Cell],
    units: &'a [LessonUnit],
    model: ConstraintModel,
    filled: Vec<bool>,
    /// Cell index chosen per already-placed unit; the undo stack.
    chosen: Vec<usize>,
    attempts: u64,
    budget: u64,
    exhausted: bool,
}

impl PlacementSearch<'_> {
    fn solve(&mut self, unit_idx: usize) -> bool {
        if unit_idx == self.units.len() {
            return true;
        }
        let unit = self.units[unit_idx];

        for cell_idx in self.candidates(unit_idx) {
            if self.attempts >= self.budget {
                self.exhausted = true;
                return false;
            }
            self.attempts += 1;

            let cell = self.cells[cell_idx];
            self.filled[cell_idx] = true;
            self.model
                .record_placement(unit.subject_id, unit.teacher_id, cell.weekday, cell.window);
            self.chosen.push(cell_idx);

            if self.solve(unit_idx + 1) {
                return true;
            }

            self.chosen.pop();
            self.model
                .release_placement(unit.subject_id, unit.teacher_id, cell.weekday, cell.window);
            self.filled[cell_idx] = false;

            if self.exhausted {
                return false;
            }
        }
        false
    }

    /// Eligible cells for one unit, most preferred first.
    ///
    /// Ordering: cells on days where the unit's teacher already holds a
    /// placement in this run come first (day-clustering preference), then
    /// the remaining cells, both in weekday-then-time order. Units of one
    /// subject are interchangeable, so a unit following a sibling of the
    /// same subject only considers cells strictly after the sibling's cell;
    /// this removes permutation retries without losing any solution.
    fn candidates(&self, unit_idx: usize) -> Vec<usize> {
        let unit = self.units[unit_idx];
        let min_cell = if unit_idx > 0 && self.units[unit_idx - 1].subject_id == unit.subject_id {
            self.chosen[unit_idx - 1] + 1
        } else {
            0
        };

        let preferred: HashSet<Weekday> = self
            .chosen
            .iter()
            .enumerate()
            .filter(|(placed_idx, _)| self.units[*placed_idx].teacher_id == unit.teacher_id)
            .map(|(_, &cell_idx)| self.cells[cell_idx].weekday)
            .collect();

        ordered_cell_indices(self.cells, Some(&preferred), min_cell)
            .filter(|&idx| {
                !self.filled[idx]
                    && self.model.is_teacher_free(
                        unit.teacher_id,
                        self.cells[idx].weekday,
                        &self.cells[idx].window,
                    )
                    && !self
                        .model
                        .subject_cap_reached(unit.subject_id, self.cells[idx].weekday)
            })
            .collect()
    }
}

// ==========================================
// Helpers
// ==========================================

fn check_assignments(assignments: &[Assignment]) -> Result<(), SchedulerError> {
    if assignments.is_empty() {
        return Err(SchedulerError::EmptyAssignments);
    }
    let mut seen: HashSet<SubjectId> = HashSet::new();
    for assignment in assignments {
        if assignment.weekly_lessons == 0 {
            return Err(SchedulerError::ZeroLessonAssignment {
                subject_id: assignment.subject_id,
            });
        }
        if !seen.insert(assignment.subject_id) {
            return Err(SchedulerError::DuplicateSubject {
                subject_id: assignment.subject_id,
            });
        }
    }
    Ok(())
}

/// Weekly cells in weekday-then-time order.
fn build_cells(grid: &TimeGrid) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(grid.week_capacity());
    for weekday in Weekday::SCHOOL_WEEK {
        for slot in grid.slots() {
            cells.push(Cell {
                weekday,
                window: slot.window,
            });
        }
    }
    cells
}

/// Expand assignments into lesson-units: most-constrained-first (descending
/// weekly count, subject id as tie-break), units of one subject contiguous.
fn build_units(assignments: &[Assignment]) -> Vec<LessonUnit> {
    let mut sorted: Vec<&Assignment> = assignments.iter().collect();
    sorted.sort_by_key(|a| (Reverse(a.weekly_lessons), a.subject_id));

    sorted
        .iter()
        .flat_map(|a| {
            std::iter::repeat(LessonUnit {
                subject_id: a.subject_id,
                teacher_id: a.teacher_id,
            })
            .take(a.weekly_lessons as usize)
        })
        .collect()
}

/// Base-order cell walk with the day-clustering preference applied: indices
/// on preferred days first, the rest after, base order preserved within each
/// group.
fn ordered_cell_indices<'a>(
    cells: &'a [Cell],
    preferred_days: Option<&'a HashSet<Weekday>>,
    min_cell: usize,
) -> impl Iterator<Item = usize> + 'a {
    let on_preferred = move |idx: &usize| {
        preferred_days
            .map(|days| days.contains(&cells[*idx].weekday))
            .unwrap_or(false)
    };
    let first: Vec<usize> = (min_cell..cells.len()).filter(on_preferred).collect();
    let rest = (min_cell..cells.len()).filter(move |idx| !on_preferred(idx));
    first.into_iter().chain(rest)
}

fn assemble(units: &[LessonUnit], chosen: &[usize], cells: &[Cell]) -> Timetable {
    let placements = units
        .iter()
        .zip(chosen.iter())
        .map(|(unit, &cell_idx)| {
            let cell = cells[cell_idx];
            LessonPlacement {
                subject_id: unit.subject_id,
                teacher_id: unit.teacher_id,
                weekday: cell.weekday,
                start: cell.window.start,
                end: cell.window.end,
                origin: PlacementOrigin::Generated,
            }
        })
        .collect();
    Timetable::from_placements(placements)
}

/// Why a unit found no cell: no capacity at all, teacher blocked everywhere,
/// or free somewhere but capped on every such day.
fn diagnose_unplaced(
    unit: &LessonUnit,
    cells: &[Cell],
    filled: &[bool],
    model: &ConstraintModel,
) -> UnplacedReason {
    let mut any_unfilled = false;
    let mut teacher_free_somewhere = false;

    for (idx, cell) in cells.iter().enumerate() {
        if filled[idx] {
            continue;
        }
        any_unfilled = true;
        if model.is_teacher_free(unit.teacher_id, cell.weekday, &cell.window) {
            teacher_free_somewhere = true;
        }
    }

    if !any_unfilled {
        UnplacedReason::NoCapacity
    } else if !teacher_free_somewhere {
        UnplacedReason::TeacherConflict
    } else {
        UnplacedReason::SubjectCapReached
    }
}
