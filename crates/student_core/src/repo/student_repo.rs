//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/fetch/list/update/delete/count over the `students` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `list_all` order is `id DESC` (newest first). `AUTOINCREMENT` ids only
//!   grow, so the order survives wall-clock changes; `created_at` is display data.
//! - Update and delete report affected row counts instead of failing on a
//!   missing id.
//! - Read paths reject undecodable rows instead of masking them.

use crate::db::DbError;
use crate::model::student::{Student, StudentId};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    grade,
    course,
    created_at
FROM students";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for student persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for student CRUD operations.
pub trait StudentRepository {
    /// Inserts one row and returns the storage-assigned id.
    fn insert(&self, name: &str, grade: i32, course: &str) -> RepoResult<StudentId>;
    fn fetch(&self, id: StudentId) -> RepoResult<Option<Student>>;
    /// Returns every row, newest first.
    fn list_all(&self) -> RepoResult<Vec<Student>>;
    /// Writes name/grade/course for `student.id`; returns affected rows.
    fn update(&self, student: &Student) -> RepoResult<usize>;
    /// Deletes the row for `student.id`; returns affected rows.
    fn delete(&self, student: &Student) -> RepoResult<usize>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed student repository owning its connection.
pub struct SqliteStudentRepository {
    conn: Connection,
}

impl SqliteStudentRepository {
    /// Wraps a connection returned by `db::open_db` or `db::open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl StudentRepository for SqliteStudentRepository {
    fn insert(&self, name: &str, grade: i32, course: &str) -> RepoResult<StudentId> {
        self.conn.execute(
            "INSERT INTO students (name, grade, course) VALUES (?1, ?2, ?3);",
            params![name, grade, course],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("event=student_insert module=repo status=ok id={id}");
        Ok(id)
    }

    fn fetch(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let row = self
            .conn
            .query_row(
                &format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                read_raw_row,
            )
            .optional()?;

        row.map(RawStudentRow::into_student).transpose()
    }

    fn list_all(&self) -> RepoResult<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} ORDER BY id DESC;"))?;
        let mut rows = stmt.query([])?;
        let mut students = Vec::new();

        while let Some(row) = rows.next()? {
            students.push(read_raw_row(row)?.into_student()?);
        }

        Ok(students)
    }

    fn update(&self, student: &Student) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE students
             SET
                name = ?1,
                grade = ?2,
                course = ?3
             WHERE id = ?4;",
            params![
                student.name.as_str(),
                student.grade,
                student.course.as_str(),
                student.id
            ],
        )?;
        debug!(
            "event=student_update module=repo status=ok id={} changed={}",
            student.id, changed
        );
        Ok(changed)
    }

    fn delete(&self, student: &Student) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1;", [student.id])?;
        debug!(
            "event=student_delete module=repo status=ok id={} changed={}",
            student.id, changed
        );
        Ok(changed)
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM students;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

struct RawStudentRow {
    id: StudentId,
    name: String,
    grade: i64,
    course: String,
    created_at: i64,
}

impl RawStudentRow {
    fn into_student(self) -> RepoResult<Student> {
        let grade = i32::try_from(self.grade).map_err(|_| {
            RepoError::InvalidData(format!(
                "grade `{}` out of range in students.grade for id {}",
                self.grade, self.id
            ))
        })?;

        Ok(Student {
            id: self.id,
            name: self.name,
            grade,
            course: self.course,
            created_at: self.created_at,
        })
    }
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawStudentRow> {
    Ok(RawStudentRow {
        id: row.get("id")?,
        name: row.get("name")?,
        grade: row.get("grade")?,
        course: row.get("course")?,
        created_at: row.get("created_at")?,
    })
}
