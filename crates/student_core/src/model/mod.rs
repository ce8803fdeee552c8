//! Domain model for student records.
//!
//! # Invariants
//! - Every stored student is identified by a storage-assigned `StudentId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod student;
