//! Course page requests: create with caller-assigned number, details view.

use crate::dispatch::{
    Command, Handler, ProcessError, ProcessResult, Query, Request, RequestContext,
    ValidationResult, Validator,
};
use crate::model::course::{Course, CourseId};
use crate::model::department::DepartmentId;
use crate::repo::course_repo::{CourseDetail, CourseRepository, SqliteCourseRepository};

// ---- create ----

#[derive(Debug, Clone)]
pub struct CourseCreateCommand {
    /// Caller-assigned course number.
    pub id: CourseId,
    pub title: String,
    pub credits: i64,
    pub department_id: DepartmentId,
}

impl Request for CourseCreateCommand {
    type Response = CourseId;
}
impl Command for CourseCreateCommand {}

pub struct CourseCreateValidator;

impl Validator<CourseCreateCommand> for CourseCreateValidator {
    fn validate(&self, request: &CourseCreateCommand) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.require_not_empty("title", &request.title);
        result.require_max_len("title", &request.title, 50);
        result.require_range("credits", request.credits, 0, 5);
        if request.id <= 0 {
            result.push("id", "course number must be positive");
        }
        result
    }
}

pub struct CourseCreateHandler;

impl Handler<CourseCreateCommand> for CourseCreateHandler {
    fn handle(
        &self,
        request: &CourseCreateCommand,
        ctx: &RequestContext<'_>,
    ) -> ProcessResult<CourseId> {
        let repo = SqliteCourseRepository::new(ctx.conn());
        let id = repo.insert(&Course {
            id: request.id,
            title: request.title.clone(),
            credits: request.credits,
            department_id: request.department_id,
        })?;
        Ok(id)
    }
}

// ---- details ----

#[derive(Debug, Clone, Copy)]
pub struct CourseDetailsQuery {
    pub id: CourseId,
}

impl Request for CourseDetailsQuery {
    type Response = CourseDetail;
}
impl Query for CourseDetailsQuery {}

pub struct CourseDetailsHandler;

impl Handler<CourseDetailsQuery> for CourseDetailsHandler {
    fn handle(
        &self,
        request: &CourseDetailsQuery,
        ctx: &RequestContext<'_>,
    ) -> ProcessResult<CourseDetail> {
        let repo = SqliteCourseRepository::new(ctx.conn());
        repo.get_detail(request.id)?
            .ok_or_else(|| ProcessError::NotFound {
                entity: "course",
                id: request.id.to_string(),
            })
    }
}
