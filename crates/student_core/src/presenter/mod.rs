//! Screen-level controllers that replace host dialog callbacks.
//!
//! # Responsibility
//! - Own the in-memory student list and keep it aligned with storage order.
//! - Turn entry-form input into validated drafts.
//!
//! # Invariants
//! - Presenters never talk to a UI toolkit; hosts call in and render results.

pub mod entry_form;
pub mod student_list;
