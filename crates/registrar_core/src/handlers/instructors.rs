//! Instructor page requests: shared create/edit slice with course-assignment
//! reconciliation, and delete with back-reference clearing.
//!
//! # Invariants
//! - Creation and edit share one command and one reconciliation path; a new
//!   instructor simply starts from an empty persisted assignment set.
//! - `selected_courses = None` means "clear all assignments" (the form
//!   submitted no selections). See `reconcile::selection_set`.
//! - Deleting an instructor clears any department administrator
//!   back-reference inside the same transaction scope as the delete.

use crate::dispatch::{
    Command, Handler, ProcessError, ProcessResult, Query, Request, RequestContext,
    ValidationResult, Validator,
};
use crate::model::course::CourseId;
use crate::model::instructor::{Instructor, InstructorId};
use crate::reconcile;
use crate::repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
use crate::repo::instructor_repo::{
    CourseOption, InstructorRepository, SqliteInstructorRepository,
};
use serde::Serialize;

// ---- create/edit form query ----

/// `id = None` loads a blank creation form; `Some` loads the edit form.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstructorCreateEditQuery {
    pub id: Option<InstructorId>,
}

/// Form shape for the shared create/edit page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructorForm {
    pub id: Option<InstructorId>,
    pub last_name: String,
    pub first_name: String,
    pub hire_date: i64,
    pub office_location: Option<String>,
    /// Every course with its current assignment flag.
    pub course_options: Vec<CourseOption>,
}

impl Request for InstructorCreateEditQuery {
    type Response = InstructorForm;
}
impl Query for InstructorCreateEditQuery {}

pub struct InstructorCreateEditQueryHandler;

impl Handler<InstructorCreateEditQuery> for InstructorCreateEditQueryHandler {
    fn handle(
        &self,
        request: &InstructorCreateEditQuery,
        ctx: &RequestContext<'_>,
    ) -> ProcessResult<InstructorForm> {
        let repo = SqliteInstructorRepository::new(ctx.conn());

        let base = match request.id {
            None => InstructorForm {
                id: None,
                last_name: String::new(),
                first_name: String::new(),
                hire_date: 0,
                office_location: None,
                course_options: Vec::new(),
            },
            Some(id) => {
                let instructor = repo.get(id)?.ok_or_else(|| ProcessError::NotFound {
                    entity: "instructor",
                    id: id.to_string(),
                })?;
                InstructorForm {
                    id: Some(instructor.id),
                    last_name: instructor.last_name,
                    first_name: instructor.first_name,
                    hire_date: instructor.hire_date,
                    office_location: instructor.office_location,
                    course_options: Vec::new(),
                }
            }
        };

        let course_options = repo.course_options(request.id)?;
        Ok(InstructorForm {
            course_options,
            ..base
        })
    }
}

// ---- create/edit command ----

/// One command serves both creation (`id = None`) and edit.
#[derive(Debug, Clone, Default)]
pub struct InstructorCreateEditCommand {
    pub id: Option<InstructorId>,
    pub last_name: String,
    pub first_name: String,
    pub hire_date: i64,
    pub office_location: Option<String>,
    /// Desired course assignment; `None` means nothing was submitted.
    pub selected_courses: Option<Vec<CourseId>>,
}

impl Request for InstructorCreateEditCommand {
    type Response = InstructorId;
}
impl Command for InstructorCreateEditCommand {}

pub struct InstructorCreateEditValidator;

impl Validator<InstructorCreateEditCommand> for InstructorCreateEditValidator {
    fn validate(&self, request: &InstructorCreateEditCommand) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.require_not_empty("last_name", &request.last_name);
        result.require_max_len("last_name", &request.last_name, 50);
        result.require_not_empty("first_name", &request.first_name);
        result.require_max_len("first_name", &request.first_name, 50);
        result
    }
}

pub struct InstructorCreateEditHandler;

impl Handler<InstructorCreateEditCommand> for InstructorCreateEditHandler {
    fn handle(
        &self,
        request: &InstructorCreateEditCommand,
        ctx: &RequestContext<'_>,
    ) -> ProcessResult<InstructorId> {
        let repo = SqliteInstructorRepository::new(ctx.conn());

        let id = match request.id {
            None => repo.insert(
                &request.last_name,
                &request.first_name,
                request.hire_date,
                request.office_location.as_deref(),
            )?,
            Some(id) => {
                repo.get(id)?.ok_or_else(|| ProcessError::NotFound {
                    entity: "instructor",
                    id: id.to_string(),
                })?;
                repo.update(&Instructor {
                    id,
                    last_name: request.last_name.clone(),
                    first_name: request.first_name.clone(),
                    hire_date: request.hire_date,
                    office_location: request.office_location.clone(),
                })?;
                id
            }
        };

        let existing = repo.assigned_course_ids(id)?;
        let desired = reconcile::selection_set(request.selected_courses.as_deref());
        let delta = reconcile::diff(&existing, &desired);
        repo.apply_assignment_delta(id, &delta)?;

        Ok(id)
    }
}

// ---- delete ----

#[derive(Debug, Clone, Copy)]
pub struct InstructorDeleteCommand {
    pub id: InstructorId,
}

impl Request for InstructorDeleteCommand {
    type Response = ();
}
impl Command for InstructorDeleteCommand {}

pub struct InstructorDeleteHandler;

impl Handler<InstructorDeleteCommand> for InstructorDeleteHandler {
    fn handle(
        &self,
        request: &InstructorDeleteCommand,
        ctx: &RequestContext<'_>,
    ) -> ProcessResult<()> {
        let departments = SqliteDepartmentRepository::new(ctx.conn());
        departments.clear_administrator(request.id)?;

        let instructors = SqliteInstructorRepository::new(ctx.conn());
        instructors.delete(request.id)?;
        Ok(())
    }
}
