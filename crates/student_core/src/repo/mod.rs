//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract used by the list presenter.
//! - Isolate SQLite query details from presentation logic.

pub mod student_repo;
