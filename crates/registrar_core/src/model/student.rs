//! Student entity.

use serde::{Deserialize, Serialize};

pub type StudentId = i64;

/// Enrolled student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub last_name: String,
    pub first_name: String,
    /// Unix epoch milliseconds.
    pub enrollment_date: i64,
}
