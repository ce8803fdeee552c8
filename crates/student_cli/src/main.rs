//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `student_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("student_core ping={}", student_core::ping());
    println!("student_core version={}", student_core::core_version());
}
