//! Record-page request handlers and dispatcher wiring.
//!
//! # Responsibility
//! - Declare each page's request/response shapes, validators, and handlers.
//! - Build the fully wired dispatcher and expose the contract list driving
//!   the startup validity check.
//!
//! # Invariants
//! - Page modules contain only shape declarations and handler bodies; all
//!   pipeline logic (validation ordering, transactions, routing) lives in
//!   `dispatch`.
//! - Every request type registered here also appears in
//!   `request_contracts()`, and vice versa.

use crate::dispatch::{contract, ConfigurationError, Dispatcher, RequestContract};

pub mod courses;
pub mod departments;
pub mod instructors;
pub mod students;

/// Builds the dispatcher with every record-page registration.
pub fn build_dispatcher() -> Result<Dispatcher, ConfigurationError> {
    let dispatcher = Dispatcher::builder()
        .handler(students::StudentIndexHandler)
        .handler(students::StudentCreateHandler)
        .validator(students::StudentCreateValidator)
        .handler(students::StudentEditHandler)
        .validator(students::StudentEditValidator)
        .handler(students::StudentDeleteHandler)
        .handler(courses::CourseCreateHandler)
        .validator(courses::CourseCreateValidator)
        .handler(courses::CourseDetailsHandler)
        .handler(instructors::InstructorCreateEditQueryHandler)
        .handler(instructors::InstructorCreateEditHandler)
        .validator(instructors::InstructorCreateEditValidator)
        .handler(instructors::InstructorDeleteHandler)
        .handler(departments::DepartmentCreateHandler)
        .validator(departments::DepartmentValidator)
        .handler(departments::DepartmentEditQueryHandler)
        .handler(departments::DepartmentEditHandler)
        .validator(departments::DepartmentEditValidator)
        .handler(departments::DepartmentDeleteHandler)
        .build()?;
    Ok(dispatcher)
}

/// Every request type the application knows, with its validator expectation.
///
/// Fed to `Dispatcher::assert_configuration_valid` once at startup.
pub fn request_contracts() -> Vec<RequestContract> {
    vec![
        contract::<students::StudentIndexQuery>(false),
        contract::<students::StudentCreateCommand>(true),
        contract::<students::StudentEditCommand>(true),
        contract::<students::StudentDeleteCommand>(false),
        contract::<courses::CourseCreateCommand>(true),
        contract::<courses::CourseDetailsQuery>(false),
        contract::<instructors::InstructorCreateEditQuery>(false),
        contract::<instructors::InstructorCreateEditCommand>(true),
        contract::<instructors::InstructorDeleteCommand>(false),
        contract::<departments::DepartmentCreateCommand>(true),
        contract::<departments::DepartmentEditQuery>(false),
        contract::<departments::DepartmentEditCommand>(true),
        contract::<departments::DepartmentDeleteCommand>(false),
    ]
}
