//! Course repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Course numbers are caller-assigned primary keys; inserting a taken
//!   number is surfaced as `InvalidData`, not silently replaced.

use crate::model::course::{Course, CourseId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use serde::Serialize;

/// Detail read model joining the owning department's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseDetail {
    pub id: CourseId,
    pub title: String,
    pub credits: i64,
    pub department_name: String,
}

/// Repository interface for course records.
pub trait CourseRepository {
    fn insert(&self, course: &Course) -> RepoResult<CourseId>;
    fn get(&self, id: CourseId) -> RepoResult<Option<Course>>;
    fn get_detail(&self, id: CourseId) -> RepoResult<Option<CourseDetail>>;
    /// All courses ordered by course number, for assignment option lists.
    fn list(&self) -> RepoResult<Vec<Course>>;
}

/// SQLite-backed course repository.
pub struct SqliteCourseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCourseRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CourseRepository for SqliteCourseRepository<'_> {
    fn insert(&self, course: &Course) -> RepoResult<CourseId> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO courses (id, title, credits, department_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![course.id, course.title, course.credits, course.department_id],
        )?;

        if inserted == 0 {
            return Err(RepoError::InvalidData(format!(
                "course number {} is already taken",
                course.id
            )));
        }

        Ok(course.id)
    }

    fn get(&self, id: CourseId) -> RepoResult<Option<Course>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, credits, department_id FROM courses WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_course_row(row)?));
        }
        Ok(None)
    }

    fn get_detail(&self, id: CourseId) -> RepoResult<Option<CourseDetail>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.title, c.credits, d.name AS department_name
             FROM courses c
             INNER JOIN departments d ON d.id = c.department_id
             WHERE c.id = ?1;",
        )?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(CourseDetail {
                id: row.get("id")?,
                title: row.get("title")?,
                credits: row.get("credits")?,
                department_name: row.get("department_name")?,
            }));
        }
        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<Course>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, credits, department_id FROM courses ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut courses = Vec::new();
        while let Some(row) = rows.next()? {
            courses.push(parse_course_row(row)?);
        }
        Ok(courses)
    }
}

fn parse_course_row(row: &Row<'_>) -> RepoResult<Course> {
    Ok(Course {
        id: row.get("id")?,
        title: row.get("title")?,
        credits: row.get("credits")?,
        department_id: row.get("department_id")?,
    })
}
