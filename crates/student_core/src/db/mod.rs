//! Student store bootstrap: connection setup and schema migrations.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - Student rows are only touched after every migration has committed.
//! - Errors name the store they came from (file path or in-memory).

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Which store a connection points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    Memory,
    File(PathBuf),
}

impl DbTarget {
    /// Short label used in `mode=` log fields.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File(_) => "file",
        }
    }
}

impl Display for DbTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "in-memory student store"),
            Self::File(path) => write!(f, "student store `{}`", path.display()),
        }
    }
}

#[derive(Debug)]
pub enum DbError {
    /// Connecting or configuring the connection failed.
    Open {
        target: DbTarget,
        source: rusqlite::Error,
    },
    /// One migration script failed; nothing from the batch was committed.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Query failure on an already-open store.
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => write!(f, "failed to open {target}: {source}"),
            Self::Migration { version, source } => {
                write!(f, "student schema migration {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "student schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{DbError, DbTarget};
    use std::path::PathBuf;

    #[test]
    fn open_error_names_the_store() {
        let err = DbError::Open {
            target: DbTarget::File(PathBuf::from("/data/students.db")),
            source: rusqlite::Error::InvalidQuery,
        };
        assert!(err.to_string().contains("/data/students.db"));
        assert_eq!(DbTarget::Memory.mode(), "memory");
    }
}
