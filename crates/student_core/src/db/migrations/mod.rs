//! Versioned schema for the student store.
//!
//! # Invariants
//! - Versions start at 1 and increase by one per entry.
//! - Pending versions run inside one transaction; `user_version` is bumped
//!   after each script so a failure rolls back the whole batch.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

/// `(version, script)` pairs in apply order.
const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_students.sql"))];

/// Highest schema version this build can open.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings the store up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `Migration` naming the first script that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();

    if found > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    let pending: Vec<(u32, &str)> = SCHEMA_STEPS
        .iter()
        .copied()
        .filter(|(version, _)| *version > found)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, script) in pending {
        run_step(&tx, version, script).map_err(|source| DbError::Migration { version, source })?;
        info!("event=db_migration module=db status=ok version={version}");
    }
    tx.commit()?;
    Ok(())
}

fn run_step(tx: &Transaction<'_>, version: u32, script: &str) -> rusqlite::Result<()> {
    tx.execute_batch(script)?;
    tx.pragma_update(None, "user_version", version)
}
