//! Instructor entity.

use serde::{Deserialize, Serialize};

pub type InstructorId = i64;

/// Teaching staff record. Course links live in the `course_assignments`
/// relation and are maintained by set reconciliation, not on this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: InstructorId,
    pub last_name: String,
    pub first_name: String,
    /// Unix epoch milliseconds.
    pub hire_date: i64,
    pub office_location: Option<String>,
}
