//! Student page requests: searched/sorted/paginated index plus CRUD.
//!
//! # Invariants
//! - A fresh search string resets the requested page to 1 before pagination
//!   runs; paging within an unchanged filter keeps the caller's page.

use crate::dispatch::{
    Command, Handler, ProcessError, ProcessResult, Query, Request, RequestContext,
    ValidationResult, Validator,
};
use crate::model::student::StudentId;
use crate::page::{PageRequest, PaginatedList};
use crate::repo::student_repo::{
    SortOrder, SqliteStudentRepository, StudentRepository, StudentRow,
};
use serde::Serialize;

/// Fixed page size of the student index.
pub const STUDENT_PAGE_SIZE: u32 = 3;

// ---- index ----

#[derive(Debug, Clone, Default)]
pub struct StudentIndexQuery {
    /// Freshly submitted search term; its presence resets paging.
    pub search_string: Option<String>,
    /// Filter carried over from the previous request.
    pub current_filter: Option<String>,
    pub sort: SortOrder,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentIndexResult {
    pub current_filter: Option<String>,
    pub results: PaginatedList<StudentRow>,
}

impl Request for StudentIndexQuery {
    type Response = StudentIndexResult;
}
impl Query for StudentIndexQuery {}

pub struct StudentIndexHandler;

impl Handler<StudentIndexQuery> for StudentIndexHandler {
    fn handle(
        &self,
        request: &StudentIndexQuery,
        ctx: &RequestContext<'_>,
    ) -> ProcessResult<StudentIndexResult> {
        let filter = request
            .search_string
            .clone()
            .or_else(|| request.current_filter.clone());

        // Caller policy, not a pagination invariant: a new search term
        // invalidates the old page position.
        let page_index = if request.search_string.is_some() {
            1
        } else {
            request.page.unwrap_or(1)
        };

        let repo = SqliteStudentRepository::new(ctx.conn());
        let results = repo.search_page(
            filter.as_deref(),
            request.sort,
            PageRequest::new(page_index, STUDENT_PAGE_SIZE),
        )?;

        Ok(StudentIndexResult {
            current_filter: filter,
            results,
        })
    }
}

// ---- create ----

#[derive(Debug, Clone)]
pub struct StudentCreateCommand {
    pub last_name: String,
    pub first_name: String,
    pub enrollment_date: i64,
}

impl Request for StudentCreateCommand {
    type Response = StudentId;
}
impl Command for StudentCreateCommand {}

pub struct StudentCreateValidator;

impl Validator<StudentCreateCommand> for StudentCreateValidator {
    fn validate(&self, request: &StudentCreateCommand) -> ValidationResult {
        let mut result = ValidationResult::new();
        validate_student_names(&mut result, &request.last_name, &request.first_name);
        result
    }
}

pub struct StudentCreateHandler;

impl Handler<StudentCreateCommand> for StudentCreateHandler {
    fn handle(
        &self,
        request: &StudentCreateCommand,
        ctx: &RequestContext<'_>,
    ) -> ProcessResult<StudentId> {
        let repo = SqliteStudentRepository::new(ctx.conn());
        let id = repo.insert(
            &request.last_name,
            &request.first_name,
            request.enrollment_date,
        )?;
        Ok(id)
    }
}

// ---- edit ----

#[derive(Debug, Clone)]
pub struct StudentEditCommand {
    pub id: StudentId,
    pub last_name: String,
    pub first_name: String,
    pub enrollment_date: i64,
}

impl Request for StudentEditCommand {
    type Response = ();
}
impl Command for StudentEditCommand {}

pub struct StudentEditValidator;

impl Validator<StudentEditCommand> for StudentEditValidator {
    fn validate(&self, request: &StudentEditCommand) -> ValidationResult {
        let mut result = ValidationResult::new();
        validate_student_names(&mut result, &request.last_name, &request.first_name);
        result
    }
}

pub struct StudentEditHandler;

impl Handler<StudentEditCommand> for StudentEditHandler {
    fn handle(&self, request: &StudentEditCommand, ctx: &RequestContext<'_>) -> ProcessResult<()> {
        let repo = SqliteStudentRepository::new(ctx.conn());
        let mut student = repo
            .get(request.id)?
            .ok_or_else(|| ProcessError::NotFound {
                entity: "student",
                id: request.id.to_string(),
            })?;

        student.last_name = request.last_name.clone();
        student.first_name = request.first_name.clone();
        student.enrollment_date = request.enrollment_date;
        repo.update(&student)?;
        Ok(())
    }
}

// ---- delete ----

#[derive(Debug, Clone, Copy)]
pub struct StudentDeleteCommand {
    pub id: StudentId,
}

impl Request for StudentDeleteCommand {
    type Response = ();
}
impl Command for StudentDeleteCommand {}

pub struct StudentDeleteHandler;

impl Handler<StudentDeleteCommand> for StudentDeleteHandler {
    fn handle(
        &self,
        request: &StudentDeleteCommand,
        ctx: &RequestContext<'_>,
    ) -> ProcessResult<()> {
        let repo = SqliteStudentRepository::new(ctx.conn());
        repo.delete(request.id)?;
        Ok(())
    }
}

fn validate_student_names(result: &mut ValidationResult, last_name: &str, first_name: &str) {
    result.require_not_empty("last_name", last_name);
    result.require_max_len("last_name", last_name, 50);
    result.require_not_empty("first_name", first_name);
    result.require_max_len("first_name", first_name, 50);
}
