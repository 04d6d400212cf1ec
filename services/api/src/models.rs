//! Student service models

pub mod student;

// Re-export for convenience
pub use student::{NewStudent, Student, StudentFilter, StudentListResponse, StudentUpdate};
