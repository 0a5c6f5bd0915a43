//! Core request-processing pipeline for the registrar record application.
//! This crate is the single source of truth for dispatch, transaction, and
//! reconciliation invariants; pages contribute only request shapes and
//! handlers.

pub mod db;
pub mod dispatch;
pub mod handlers;
pub mod logging;
pub mod model;
pub mod page;
pub mod reconcile;
pub mod repo;

pub use dispatch::{
    contract, execute_scope, CancellationToken, Command, ConfigurationError, ConfigurationIssue,
    Dispatcher, DispatcherBuilder, FieldFailure, Handler, ProcessError, ProcessResult, Query,
    Request, RequestContext, RequestContract, ValidationResult, Validator,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use page::{paginate, PageRequest, PaginatedList};
pub use reconcile::{diff, selection_set, SetDelta};
pub use repo::{RepoError, RepoResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
