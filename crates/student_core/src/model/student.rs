//! Student domain model.
//!
//! # Invariants
//! - `id` is assigned by storage on insert and never changes afterwards.
//! - `name`, `grade` and `course` may be overwritten in place.

use serde::{Deserialize, Serialize};

/// Storage-assigned row identifier.
pub type StudentId = i64;

/// One student row as stored and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub grade: i32,
    pub course: String,
    /// Unix epoch milliseconds, set by storage on insert.
    pub created_at: i64,
}

impl Student {
    /// Overwrites the editable fields, keeping identity and creation time.
    pub fn apply_edit(&mut self, name: impl Into<String>, grade: i32, course: impl Into<String>) {
        self.name = name.into();
        self.grade = grade;
        self.course = course.into();
    }
}
