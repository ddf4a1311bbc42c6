// ==========================================
// School Timetable Scheduling - timetable API
// ==========================================
// Responsibility: the in-process contract the host application calls.
// 1. snapshot loading (class context + teacher constraints)
// 2. generation (scheduler + independent validation, nothing persisted)
// 3. candidate validation (external proposals are checked, never trusted)
// 4. save (re-validate against fresh data, then atomic replace + flag)
// 5. clear (atomic delete + flag)
// ==========================================

use std::sync::Arc;

use crate::config::ConfigManager;
use crate::domain::{
    required_lessons, Assignment, ClassId, ClassScheduleTemplate, TeacherConstraintSet, TeacherId,
    Timetable,
};
use crate::engine::{ScheduleValidator, Scheduler, Violation};
use crate::api::error::{ApiError, ApiResult};
use crate::repository::{ClassRepository, ClassRow, CommitmentRepository, TimetableRepository};
use tracing::{info, warn};

/// Everything the scheduler needs to know about one class: the schedule
/// template plus the subject/teacher assignments.
#[derive(Debug, Clone)]
pub struct ClassContext {
    pub template: ClassScheduleTemplate,
    pub assignments: Vec<Assignment>,
}

impl ClassContext {
    /// Teachers involved in this class, sorted and deduplicated.
    pub fn teacher_ids(&self) -> Vec<TeacherId> {
        let mut ids: Vec<TeacherId> = self.assignments.iter().map(|a| a.teacher_id).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn required_lessons(&self) -> usize {
        required_lessons(&self.assignments)
    }
}

// ==========================================
// TimetableApi
// ==========================================
pub struct TimetableApi {
    class_repo: Arc<ClassRepository>,
    commitment_repo: Arc<CommitmentRepository>,
    timetable_repo: Arc<TimetableRepository>,
    config_manager: Arc<ConfigManager>,
}

impl TimetableApi {
    pub fn new(
        class_repo: Arc<ClassRepository>,
        commitment_repo: Arc<CommitmentRepository>,
        timetable_repo: Arc<TimetableRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            class_repo,
            commitment_repo,
            timetable_repo,
            config_manager,
        }
    }

    /// Load the class context: schedule template + assignment list.
    pub fn load_class_context(&self, class_id: ClassId) -> ApiResult<ClassContext> {
        let template = self.class_repo.find_template(class_id)?;
        let assignments = self.class_repo.find_assignments(class_id)?;
        Ok(ClassContext {
            template,
            assignments,
        })
    }

    /// Snapshot the given teachers' constraints: fixed commitments plus
    /// lessons held in classes other than `exclude_class`.
    pub fn load_teacher_constraints(
        &self,
        teacher_ids: &[TeacherId],
        exclude_class: ClassId,
    ) -> ApiResult<TeacherConstraintSet> {
        let commitments = self.commitment_repo.find_by_teachers(teacher_ids)?;
        let existing_placements = self
            .timetable_repo
            .find_for_teachers_excluding_class(teacher_ids, exclude_class)?;
        Ok(TeacherConstraintSet::new(commitments, existing_placements))
    }

    /// Generate a candidate timetable for one class. Nothing is persisted;
    /// the caller decides whether to save.
    ///
    /// The scheduler's output is re-checked by the independent validator
    /// before it is handed out - a generated timetable with violations is a
    /// bug, and it is rejected rather than returned.
    pub fn generate(&self, class_id: ClassId) -> ApiResult<Timetable> {
        let context = self.load_class_context(class_id)?;
        let constraints = self.load_teacher_constraints(&context.teacher_ids(), class_id)?;
        let config = self
            .config_manager
            .scheduling_config()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        let scheduler = Scheduler::new(config.clone());
        let timetable = scheduler.generate(&context.template, &context.assignments, &constraints)?;

        let violations = ScheduleValidator::new(config).validate(
            &timetable,
            &context.template,
            &context.assignments,
            &constraints,
        );
        if !violations.is_empty() {
            warn!(
                class_id,
                violations = violations.len(),
                "generated timetable failed independent validation"
            );
            return Err(ApiError::ValidationRejected { violations });
        }

        info!(class_id, placements = timetable.len(), "timetable generated");
        Ok(timetable)
    }

    /// Validate any candidate timetable against fresh class context and
    /// constraint data. Empty result means the candidate is acceptable.
    pub fn validate(&self, class_id: ClassId, candidate: &Timetable) -> ApiResult<Vec<Violation>> {
        let context = self.load_class_context(class_id)?;
        let constraints = self.load_teacher_constraints(&context.teacher_ids(), class_id)?;
        let config = self
            .config_manager
            .scheduling_config()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(ScheduleValidator::new(config).validate(
            candidate,
            &context.template,
            &context.assignments,
            &constraints,
        ))
    }

    /// Persist a timetable: atomic replace of the class's placements plus
    /// the generated-timetable flag.
    ///
    /// Constraint data may have changed since the candidate was produced
    /// (another class sharing a teacher may have been generated and saved in
    /// between), so the candidate is re-validated against freshly loaded
    /// data immediately before the write.
    pub fn save_timetable(&self, class_id: ClassId, timetable: &Timetable) -> ApiResult<()> {
        let violations = self.validate(class_id, timetable)?;
        if !violations.is_empty() {
            warn!(
                class_id,
                violations = violations.len(),
                "refusing to save: candidate no longer passes validation"
            );
            return Err(ApiError::ValidationRejected { violations });
        }

        self.timetable_repo.replace_for_class(class_id, timetable)?;
        Ok(())
    }

    /// Drop a class's timetable and lower the generated-timetable flag.
    pub fn clear_timetable(&self, class_id: ClassId) -> ApiResult<()> {
        self.timetable_repo.clear_for_class(class_id)?;
        Ok(())
    }

    /// Stored timetable of one class (empty if none was saved).
    pub fn load_timetable(&self, class_id: ClassId) -> ApiResult<Timetable> {
        Ok(self.timetable_repo.find_by_class(class_id)?)
    }

    /// Class listing row, including the generated-timetable flag.
    pub fn class_row(&self, class_id: ClassId) -> ApiResult<ClassRow> {
        Ok(self.class_repo.find_row(class_id)?)
    }
}
