//! Course entity.

use crate::model::department::DepartmentId;
use serde::{Deserialize, Serialize};

/// Caller-assigned course number, also the primary key.
pub type CourseId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub credits: i64,
    pub department_id: DepartmentId,
}
