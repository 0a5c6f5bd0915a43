//! Instructor repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Instructor CRUD plus the course-assignment relation surface consumed
//!   by set reconciliation.
//!
//! # Invariants
//! - `apply_assignment_delta` issues independent per-key INSERT/DELETE
//!   operations; links outside the delta (and their attributes, e.g.
//!   `assigned_at`) are never touched.

use crate::model::course::CourseId;
use crate::model::instructor::{Instructor, InstructorId};
use crate::reconcile::SetDelta;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use std::collections::BTreeSet;

/// One selectable course with its current assignment flag, used to render
/// the create/edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseOption {
    pub course_id: CourseId,
    pub title: String,
    pub assigned: bool,
}

/// Repository interface for instructor records and course links.
pub trait InstructorRepository {
    fn insert(
        &self,
        last_name: &str,
        first_name: &str,
        hire_date: i64,
        office_location: Option<&str>,
    ) -> RepoResult<InstructorId>;
    fn update(&self, instructor: &Instructor) -> RepoResult<()>;
    fn get(&self, id: InstructorId) -> RepoResult<Option<Instructor>>;
    fn delete(&self, id: InstructorId) -> RepoResult<()>;
    /// Persisted assignment set for one instructor.
    fn assigned_course_ids(&self, id: InstructorId) -> RepoResult<BTreeSet<CourseId>>;
    /// Applies a reconciliation delta as per-key add/remove operations.
    fn apply_assignment_delta(
        &self,
        id: InstructorId,
        delta: &SetDelta<CourseId>,
    ) -> RepoResult<()>;
    /// Every course with its assignment flag for one (optional) instructor.
    fn course_options(&self, id: Option<InstructorId>) -> RepoResult<Vec<CourseOption>>;
}

/// SQLite-backed instructor repository.
pub struct SqliteInstructorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInstructorRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl InstructorRepository for SqliteInstructorRepository<'_> {
    fn insert(
        &self,
        last_name: &str,
        first_name: &str,
        hire_date: i64,
        office_location: Option<&str>,
    ) -> RepoResult<InstructorId> {
        self.conn.execute(
            "INSERT INTO instructors (last_name, first_name, hire_date, office_location)
             VALUES (?1, ?2, ?3, ?4);",
            params![last_name, first_name, hire_date, office_location],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, instructor: &Instructor) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE instructors
             SET last_name = ?2, first_name = ?3, hire_date = ?4, office_location = ?5
             WHERE id = ?1;",
            params![
                instructor.id,
                instructor.last_name,
                instructor.first_name,
                instructor.hire_date,
                instructor.office_location
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "instructor",
                id: instructor.id.to_string(),
            });
        }

        Ok(())
    }

    fn get(&self, id: InstructorId) -> RepoResult<Option<Instructor>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, last_name, first_name, hire_date, office_location
             FROM instructors
             WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_instructor_row(row)?));
        }
        Ok(None)
    }

    fn delete(&self, id: InstructorId) -> RepoResult<()> {
        // Course links go with the instructor via FK cascade. The department
        // administrator back-reference is the handler's responsibility.
        let changed = self
            .conn
            .execute("DELETE FROM instructors WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "instructor",
                id: id.to_string(),
            });
        }

        Ok(())
    }

    fn assigned_course_ids(&self, id: InstructorId) -> RepoResult<BTreeSet<CourseId>> {
        let mut stmt = self.conn.prepare(
            "SELECT course_id FROM course_assignments WHERE instructor_id = ?1;",
        )?;
        let mut rows = stmt.query([id])?;
        let mut course_ids = BTreeSet::new();
        while let Some(row) = rows.next()? {
            course_ids.insert(row.get::<_, CourseId>("course_id")?);
        }
        Ok(course_ids)
    }

    fn apply_assignment_delta(
        &self,
        id: InstructorId,
        delta: &SetDelta<CourseId>,
    ) -> RepoResult<()> {
        for course_id in &delta.to_add {
            self.conn.execute(
                "INSERT INTO course_assignments (instructor_id, course_id)
                 VALUES (?1, ?2);",
                params![id, course_id],
            )?;
        }
        for course_id in &delta.to_remove {
            self.conn.execute(
                "DELETE FROM course_assignments
                 WHERE instructor_id = ?1 AND course_id = ?2;",
                params![id, course_id],
            )?;
        }
        Ok(())
    }

    fn course_options(&self, id: Option<InstructorId>) -> RepoResult<Vec<CourseOption>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                c.id,
                c.title,
                EXISTS (
                    SELECT 1 FROM course_assignments ca
                    WHERE ca.course_id = c.id AND ca.instructor_id = ?1
                ) AS assigned
             FROM courses c
             ORDER BY c.id ASC;",
        )?;
        let mut rows = stmt.query(params![id])?;
        let mut options = Vec::new();
        while let Some(row) = rows.next()? {
            options.push(CourseOption {
                course_id: row.get("id")?,
                title: row.get("title")?,
                assigned: row.get::<_, i64>("assigned")? != 0,
            });
        }
        Ok(options)
    }
}

fn parse_instructor_row(row: &Row<'_>) -> RepoResult<Instructor> {
    Ok(Instructor {
        id: row.get("id")?,
        last_name: row.get("last_name")?,
        first_name: row.get("first_name")?,
        hire_date: row.get("hire_date")?,
        office_location: row.get("office_location")?,
    })
}
