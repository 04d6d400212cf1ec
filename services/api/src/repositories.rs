//! Repositories for student record operations

pub mod student;

#[cfg(test)]
pub mod memory;

// Re-export for convenience
pub use student::{PgStudentStore, RepositoryError, StoreError, StudentRepository, StudentStore};
