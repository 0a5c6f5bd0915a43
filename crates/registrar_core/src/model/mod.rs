//! School-records domain model.
//!
//! # Responsibility
//! - Define the canonical entity structures used by repositories and
//!   handlers.
//!
//! # Invariants
//! - Entity ids are stable integer keys; course numbers are caller-assigned.
//! - Dates are unix epoch milliseconds; money is integer cents.

pub mod course;
pub mod department;
pub mod instructor;
pub mod student;
