//! Flutter-facing bindings for the student records core.

pub mod api;
