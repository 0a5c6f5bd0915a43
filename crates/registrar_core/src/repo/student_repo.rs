//! Student repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide student CRUD plus the searched/sorted/paginated index source.
//!
//! # Invariants
//! - `search_page` orders deterministically before paginating: every sort
//!   order carries `id ASC` as a stable secondary key.
//! - The count and the page slice run over the same filtered source.

use crate::model::student::{Student, StudentId};
use crate::page::{paginate, PageRequest, PaginatedList};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde::Serialize;

/// Sort orders offered by the student index page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NameAsc,
    NameDesc,
    DateAsc,
    DateDesc,
}

impl SortOrder {
    fn order_by(self) -> &'static str {
        match self {
            Self::NameAsc => "last_name ASC, id ASC",
            Self::NameDesc => "last_name DESC, id ASC",
            Self::DateAsc => "enrollment_date ASC, id ASC",
            Self::DateDesc => "enrollment_date DESC, id ASC",
        }
    }
}

/// Read model for one student index row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRow {
    pub id: StudentId,
    pub last_name: String,
    pub first_name: String,
    pub enrollment_date: i64,
    pub enrollments_count: i64,
}

/// Repository interface for student records.
pub trait StudentRepository {
    fn insert(&self, last_name: &str, first_name: &str, enrollment_date: i64)
        -> RepoResult<StudentId>;
    fn update(&self, student: &Student) -> RepoResult<()>;
    fn get(&self, id: StudentId) -> RepoResult<Option<Student>>;
    fn delete(&self, id: StudentId) -> RepoResult<()>;
    /// Filtered, ordered, paginated index source.
    fn search_page(
        &self,
        filter: Option<&str>,
        sort: SortOrder,
        page: PageRequest,
    ) -> RepoResult<PaginatedList<StudentRow>>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn insert(
        &self,
        last_name: &str,
        first_name: &str,
        enrollment_date: i64,
    ) -> RepoResult<StudentId> {
        self.conn.execute(
            "INSERT INTO students (last_name, first_name, enrollment_date)
             VALUES (?1, ?2, ?3);",
            params![last_name, first_name, enrollment_date],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, student: &Student) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE students
             SET last_name = ?2, first_name = ?3, enrollment_date = ?4
             WHERE id = ?1;",
            params![
                student.id,
                student.last_name,
                student.first_name,
                student.enrollment_date
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "student",
                id: student.id.to_string(),
            });
        }

        Ok(())
    }

    fn get(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, last_name, first_name, enrollment_date
             FROM students
             WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }
        Ok(None)
    }

    fn delete(&self, id: StudentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "student",
                id: id.to_string(),
            });
        }

        Ok(())
    }

    fn search_page(
        &self,
        filter: Option<&str>,
        sort: SortOrder,
        page: PageRequest,
    ) -> RepoResult<PaginatedList<StudentRow>> {
        let mut where_clause = String::from("WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(term) = filter.map(str::trim).filter(|term| !term.is_empty()) {
            where_clause.push_str(" AND (last_name LIKE ?1 OR first_name LIKE ?1)");
            bind_values.push(Value::Text(format!("%{term}%")));
        }

        paginate(
            page,
            || {
                let sql = format!("SELECT COUNT(*) FROM students {where_clause};");
                let mut stmt = self.conn.prepare(&sql)?;
                let count: i64 =
                    stmt.query_row(params_from_iter(bind_values.iter()), |row| row.get(0))?;
                Ok::<_, RepoError>(count.max(0) as u64)
            },
            |offset, limit| {
                let sql = format!(
                    "SELECT
                        s.id,
                        s.last_name,
                        s.first_name,
                        s.enrollment_date,
                        (SELECT COUNT(*) FROM enrollments e WHERE e.student_id = s.id)
                            AS enrollments_count
                     FROM students s
                     {where_clause}
                     ORDER BY {order_by}
                     LIMIT {limit} OFFSET {offset};",
                    order_by = sort.order_by(),
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let mut rows = stmt.query(params_from_iter(bind_values.iter()))?;
                let mut students = Vec::new();
                while let Some(row) = rows.next()? {
                    students.push(StudentRow {
                        id: row.get("id")?,
                        last_name: row.get("last_name")?,
                        first_name: row.get("first_name")?,
                        enrollment_date: row.get("enrollment_date")?,
                        enrollments_count: row.get("enrollments_count")?,
                    });
                }
                Ok(students)
            },
        )
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    Ok(Student {
        id: row.get("id")?,
        last_name: row.get("last_name")?,
        first_name: row.get("first_name")?,
        enrollment_date: row.get("enrollment_date")?,
    })
}
