//! Pure request validation contracts.
//!
//! # Responsibility
//! - Define the `Validator` capability resolved per request type.
//! - Carry ordered field-level failures back to the caller.
//!
//! # Invariants
//! - Validators are pure: no I/O, no side effects, no collaborator access.
//! - An empty failure list means the request is valid.

use crate::dispatch::Request;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// One field-level rejection: field path plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    pub field: String,
    pub message: String,
}

/// Ordered sequence of field-level failures. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    failures: Vec<FieldFailure>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.failures.push(FieldFailure {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }

    /// Requires a non-empty value for `field`.
    pub fn require_not_empty(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
        }
    }

    /// Requires `value` to be at most `max` characters.
    pub fn require_max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.push(field, format!("must be at most {max} characters"));
        }
    }

    /// Requires `value` to fall within `min..=max`.
    pub fn require_range(&mut self, field: &str, value: i64, min: i64, max: i64) {
        if value < min || value > max {
            self.push(field, format!("must be between {min} and {max}"));
        }
    }
}

impl Display for ValidationResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.failures.is_empty() {
            return write!(f, "valid");
        }
        for (index, failure) in self.failures.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", failure.field, failure.message)?;
        }
        Ok(())
    }
}

/// Side-effect-free rule set resolved for one request type.
pub trait Validator<R: Request>: Send + Sync {
    fn validate(&self, request: &R) -> ValidationResult;
}
