//! Department repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Department CRUD with compare-and-swap semantics on the version token.
//!
//! # Invariants
//! - Versioned writes match on `(id, version)`; zero rows changed on an
//!   existing record means a concurrent edit and surfaces `Conflict`.
//! - Every successful versioned write rotates the token.

use crate::model::department::{Department, DepartmentId, VersionToken};
use crate::model::instructor::InstructorId;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for department records.
pub trait DepartmentRepository {
    fn insert(
        &self,
        name: &str,
        budget_cents: i64,
        start_date: i64,
        administrator_id: Option<InstructorId>,
    ) -> RepoResult<DepartmentId>;
    fn get(&self, id: DepartmentId) -> RepoResult<Option<Department>>;
    /// Compare-and-swap update; returns the rotated token on success.
    fn update_versioned(
        &self,
        department: &Department,
        expected: &VersionToken,
    ) -> RepoResult<VersionToken>;
    /// Compare-and-swap delete.
    fn delete_versioned(&self, id: DepartmentId, expected: &VersionToken) -> RepoResult<()>;
    /// Clears the administrator back-reference for one instructor.
    ///
    /// Runs inside the same scope as the instructor delete so the relation
    /// never observes a dangling foreign key.
    fn clear_administrator(&self, instructor_id: InstructorId) -> RepoResult<()>;
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn exists(&self, id: DepartmentId) -> RepoResult<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM departments WHERE id = ?1;")?;
        Ok(stmt.exists([id])?)
    }

    /// Distinguishes a stale token (row exists) from a missing row.
    fn versioned_miss(&self, id: DepartmentId) -> RepoResult<RepoError> {
        if self.exists(id)? {
            Ok(RepoError::Conflict {
                entity: "department",
                id: id.to_string(),
            })
        } else {
            Ok(RepoError::NotFound {
                entity: "department",
                id: id.to_string(),
            })
        }
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn insert(
        &self,
        name: &str,
        budget_cents: i64,
        start_date: i64,
        administrator_id: Option<InstructorId>,
    ) -> RepoResult<DepartmentId> {
        let version = VersionToken::fresh();
        self.conn.execute(
            "INSERT INTO departments (name, budget_cents, start_date, administrator_id, version)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                name,
                budget_cents,
                start_date,
                administrator_id,
                version.to_string()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, id: DepartmentId) -> RepoResult<Option<Department>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, budget_cents, start_date, administrator_id, version
             FROM departments
             WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_department_row(row)?));
        }
        Ok(None)
    }

    fn update_versioned(
        &self,
        department: &Department,
        expected: &VersionToken,
    ) -> RepoResult<VersionToken> {
        let next = VersionToken::fresh();
        let changed = self.conn.execute(
            "UPDATE departments
             SET name = ?3, budget_cents = ?4, start_date = ?5,
                 administrator_id = ?6, version = ?7
             WHERE id = ?1 AND version = ?2;",
            params![
                department.id,
                expected.to_string(),
                department.name,
                department.budget_cents,
                department.start_date,
                department.administrator_id,
                next.to_string()
            ],
        )?;

        if changed == 0 {
            return Err(self.versioned_miss(department.id)?);
        }

        Ok(next)
    }

    fn delete_versioned(&self, id: DepartmentId, expected: &VersionToken) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM departments WHERE id = ?1 AND version = ?2;",
            params![id, expected.to_string()],
        )?;

        if changed == 0 {
            return Err(self.versioned_miss(id)?);
        }

        Ok(())
    }

    fn clear_administrator(&self, instructor_id: InstructorId) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE departments SET administrator_id = NULL WHERE administrator_id = ?1;",
            [instructor_id],
        )?;
        Ok(())
    }
}

fn parse_department_row(row: &Row<'_>) -> RepoResult<Department> {
    let version_text: String = row.get("version")?;
    let version = VersionToken::parse(&version_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid version token `{version_text}` in departments.version"
        ))
    })?;

    Ok(Department {
        id: row.get("id")?,
        name: row.get("name")?,
        budget_cents: row.get("budget_cents")?,
        start_date: row.get("start_date")?,
        administrator_id: row.get("administrator_id")?,
        version,
    })
}
