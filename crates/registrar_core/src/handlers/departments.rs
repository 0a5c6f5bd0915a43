//! Department page requests: create, versioned edit/delete, edit form.
//!
//! # Invariants
//! - Edit and delete carry the version token read at query time; the write
//!   is a compare-and-swap, and a mismatch surfaces as a conflict to the
//!   caller, never a silent retry.

use crate::dispatch::{
    Command, Handler, ProcessError, ProcessResult, Query, Request, RequestContext,
    ValidationResult, Validator,
};
use crate::model::department::{Department, DepartmentId, VersionToken};
use crate::model::instructor::InstructorId;
use crate::repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};

// ---- create ----

#[derive(Debug, Clone)]
pub struct DepartmentCreateCommand {
    pub name: String,
    pub budget_cents: i64,
    pub start_date: i64,
    pub administrator_id: Option<InstructorId>,
}

impl Request for DepartmentCreateCommand {
    type Response = DepartmentId;
}
impl Command for DepartmentCreateCommand {}

/// Shared name/budget rules for department writes.
fn validate_department_fields(result: &mut ValidationResult, name: &str, budget_cents: i64) {
    if name.chars().count() < 3 {
        result.push("name", "must be at least 3 characters");
    }
    result.require_max_len("name", name, 50);
    if budget_cents < 0 {
        result.push("budget_cents", "must not be negative");
    }
}

pub struct DepartmentValidator;

impl Validator<DepartmentCreateCommand> for DepartmentValidator {
    fn validate(&self, request: &DepartmentCreateCommand) -> ValidationResult {
        let mut result = ValidationResult::new();
        validate_department_fields(&mut result, &request.name, request.budget_cents);
        result
    }
}

pub struct DepartmentCreateHandler;

impl Handler<DepartmentCreateCommand> for DepartmentCreateHandler {
    fn handle(
        &self,
        request: &DepartmentCreateCommand,
        ctx: &RequestContext<'_>,
    ) -> ProcessResult<DepartmentId> {
        let repo = SqliteDepartmentRepository::new(ctx.conn());
        let id = repo.insert(
            &request.name,
            request.budget_cents,
            request.start_date,
            request.administrator_id,
        )?;
        Ok(id)
    }
}

// ---- edit form query ----

#[derive(Debug, Clone, Copy)]
pub struct DepartmentEditQuery {
    pub id: DepartmentId,
}

impl Request for DepartmentEditQuery {
    type Response = Department;
}
impl Query for DepartmentEditQuery {}

pub struct DepartmentEditQueryHandler;

impl Handler<DepartmentEditQuery> for DepartmentEditQueryHandler {
    fn handle(
        &self,
        request: &DepartmentEditQuery,
        ctx: &RequestContext<'_>,
    ) -> ProcessResult<Department> {
        let repo = SqliteDepartmentRepository::new(ctx.conn());
        repo.get(request.id)?.ok_or_else(|| ProcessError::NotFound {
            entity: "department",
            id: request.id.to_string(),
        })
    }
}

// ---- edit command ----

#[derive(Debug, Clone)]
pub struct DepartmentEditCommand {
    pub id: DepartmentId,
    pub name: String,
    pub budget_cents: i64,
    pub start_date: i64,
    pub administrator_id: Option<InstructorId>,
    /// Token read at query time; echoed back for the compare-and-swap.
    pub version: VersionToken,
}

impl Request for DepartmentEditCommand {
    type Response = ();
}
impl Command for DepartmentEditCommand {}

pub struct DepartmentEditValidator;

impl Validator<DepartmentEditCommand> for DepartmentEditValidator {
    fn validate(&self, request: &DepartmentEditCommand) -> ValidationResult {
        let mut result = ValidationResult::new();
        validate_department_fields(&mut result, &request.name, request.budget_cents);
        result
    }
}

pub struct DepartmentEditHandler;

impl Handler<DepartmentEditCommand> for DepartmentEditHandler {
    fn handle(
        &self,
        request: &DepartmentEditCommand,
        ctx: &RequestContext<'_>,
    ) -> ProcessResult<()> {
        let repo = SqliteDepartmentRepository::new(ctx.conn());
        let department = Department {
            id: request.id,
            name: request.name.clone(),
            budget_cents: request.budget_cents,
            start_date: request.start_date,
            administrator_id: request.administrator_id,
            // Placeholder; update_versioned rotates the stored token itself.
            version: request.version.clone(),
        };
        repo.update_versioned(&department, &request.version)?;
        Ok(())
    }
}

// ---- delete ----

#[derive(Debug, Clone)]
pub struct DepartmentDeleteCommand {
    pub id: DepartmentId,
    pub version: VersionToken,
}

impl Request for DepartmentDeleteCommand {
    type Response = ();
}
impl Command for DepartmentDeleteCommand {}

pub struct DepartmentDeleteHandler;

impl Handler<DepartmentDeleteCommand> for DepartmentDeleteHandler {
    fn handle(
        &self,
        request: &DepartmentDeleteCommand,
        ctx: &RequestContext<'_>,
    ) -> ProcessResult<()> {
        let repo = SqliteDepartmentRepository::new(ctx.conn());
        repo.delete_versioned(request.id, &request.version)?;
        Ok(())
    }
}
