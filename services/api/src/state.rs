//! Application state shared across handlers

use crate::repositories::{StudentRepository, StudentStore};

/// Application state shared across handlers
///
/// Generic over the store so handlers can run against the in-memory store
/// in tests and the Postgres store in production.
#[derive(Clone)]
pub struct AppState<S: StudentStore> {
    pub students: StudentRepository<S>,
}
