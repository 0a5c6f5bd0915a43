//! Process-level error taxonomy for dispatch and transaction scopes.
//!
//! # Responsibility
//! - Separate configuration defects (missing handler) from recoverable
//!   request outcomes (validation, not-found, conflict).
//! - Map repository-level errors onto the process taxonomy unchanged in
//!   meaning.
//!
//! # Invariants
//! - `HandlerNotFound` is a startup defect; it must never be surfaced as a
//!   per-request outcome once `assert_configuration_valid` has passed.
//! - No failure is swallowed: scope rollback re-raises the original cause.

use crate::db::DbError;
use crate::dispatch::validation::ValidationResult;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProcessResult<T> = Result<T, ProcessError>;

/// Failure produced by the dispatcher, a handler, or the enclosing scope.
#[derive(Debug)]
pub enum ProcessError {
    /// No handler registered for the request type. Configuration defect.
    HandlerNotFound { request_type: &'static str },
    /// The registered validator rejected the request; the handler never ran.
    Validation(ValidationResult),
    /// Requested entity is absent.
    NotFound { entity: &'static str, id: String },
    /// Version token mismatch detected at write time. Never retried
    /// silently: resolving concurrent edits needs the user.
    ConcurrencyConflict { entity: &'static str, id: String },
    /// The cancellation signal fired before the scope began committing.
    Cancelled,
    /// Any other storage failure. Triggers scope rollback.
    Persistence(DbError),
    /// Persisted state failed domain parsing.
    InvalidData(String),
}

impl Display for ProcessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HandlerNotFound { request_type } => {
                write!(f, "no handler registered for request type {request_type}")
            }
            Self::Validation(result) => write!(f, "validation failed: {result}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::ConcurrencyConflict { entity, id } => {
                write!(f, "concurrent modification of {entity} {id} detected")
            }
            Self::Cancelled => write!(f, "request was cancelled before commit"),
            Self::Persistence(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for ProcessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for ProcessError {
    fn from(value: DbError) -> Self {
        Self::Persistence(value)
    }
}

impl From<rusqlite::Error> for ProcessError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Persistence(DbError::Sqlite(value))
    }
}

impl From<RepoError> for ProcessError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::Conflict { entity, id } => Self::ConcurrencyConflict { entity, id },
            RepoError::Db(err) => Self::Persistence(err),
            RepoError::InvalidData(message) => Self::InvalidData(message),
        }
    }
}
