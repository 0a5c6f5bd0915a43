//! Department entity and its concurrency version token.
//!
//! # Invariants
//! - `version` is opaque to callers: it is read at query time, echoed back
//!   on write, and rotated by every successful versioned write. A mismatch
//!   at write time means a concurrent edit happened in between.

use crate::model::instructor::InstructorId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type DepartmentId = i64;

/// Opaque token detecting concurrent modification of one persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionToken(Uuid);

impl VersionToken {
    /// Generates a brand-new token. Called on insert and after every
    /// successful versioned write.
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses the persisted representation. `None` for malformed values.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }
}

impl Display for VersionToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    /// Integer cents.
    pub budget_cents: i64,
    /// Unix epoch milliseconds.
    pub start_date: i64,
    /// Administrator back-reference; cleared in-scope when the instructor
    /// is deleted.
    pub administrator_id: Option<InstructorId>,
    pub version: VersionToken,
}
