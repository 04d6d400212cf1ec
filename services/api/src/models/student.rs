//! Student entity and request/response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Student entity
///
/// `deleted_at` is deliberately absent: reads never return soft-deleted
/// rows, so the column stays internal to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub major: String,
    pub grade: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Student creation payload
///
/// Serde defaults let a missing JSON field arrive as an empty value so the
/// validation layer reports it as a field error instead of the request
/// failing at deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewStudent {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub major: String,
    pub grade: String,
}

/// Student update payload; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub major: Option<String>,
    pub grade: Option<String>,
}

/// Search filters; supplied predicates are combined with AND
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudentFilter {
    /// Case-insensitive substring match on name
    pub name: Option<String>,
    /// Case-insensitive substring match on major
    pub major: Option<String>,
    /// Exact match on grade
    pub grade: Option<String>,
}

impl StudentFilter {
    /// Treat blank filter values as unset, mirroring the query-param
    /// convention where `?name=` means "no constraint on name"
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.filter(|s| !s.is_empty()),
            major: self.major.filter(|s| !s.is_empty()),
            grade: self.grade.filter(|s| !s.is_empty()),
        }
    }
}

/// Response for list and search endpoints
#[derive(Debug, Serialize)]
pub struct StudentListResponse {
    pub data: Vec<Student>,
    pub count: usize,
}
