//! Core domain logic for the student records app.
//! This crate owns storage, list state and form rules; UI hosts only call in.

pub mod db;
pub mod logging;
pub mod model;
pub mod presenter;
pub mod repo;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::student::{Student, StudentId};
pub use presenter::entry_form::{
    EntryForm, FormError, FormMode, StudentDraft, MISSING_DETAILS_MESSAGE,
};
pub use presenter::student_list::{
    ActionOutcome, ItemAction, ListChange, PresenterError, PresenterResult, StudentListPresenter,
};
pub use repo::student_repo::{RepoError, RepoResult, SqliteStudentRepository, StudentRepository};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
