//! In-memory student store
//!
//! Fixture store for tests: same contract as the Postgres store (live-email
//! uniqueness, soft-delete exclusion, monotonically assigned ids) without a
//! running database.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::models::{NewStudent, Student, StudentFilter, StudentUpdate};
use crate::repositories::student::{StoreError, StudentStore};

#[derive(Debug)]
struct Row {
    student: Student,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    rows: Vec<Row>,
}

impl Inner {
    fn live(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.deleted_at.is_none())
    }

    fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> bool {
        self.live()
            .any(|r| r.student.email == email && Some(r.student.id) != exclude_id)
    }
}

/// In-memory store, cloneable and shareable across request handlers
#[derive(Clone, Default)]
pub struct MemoryStudentStore {
    inner: Arc<Mutex<Inner>>,
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn insert(&self, new: &NewStudent) -> Result<Student, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        if inner.email_taken(&new.email, None) {
            return Err(StoreError::DuplicateEmail);
        }

        inner.next_id += 1;
        let now = Utc::now();
        let student = Student {
            id: inner.next_id,
            name: new.name.clone(),
            age: new.age,
            gender: new.gender.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            major: new.major.clone(),
            grade: new.grade.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.rows.push(Row {
            student: student.clone(),
            deleted_at: None,
        });

        Ok(student)
    }

    async fn find_by_id(&self, id: i64) -> Result<Student, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .live()
            .find(|r| r.student.id == id)
            .map(|r| r.student.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn find_all(&self) -> Result<Vec<Student>, StoreError> {
        let inner = self.inner.lock().unwrap();
        // Rows are appended in id order
        Ok(inner.live().map(|r| r.student.clone()).collect())
    }

    async fn search(&self, filter: &StudentFilter) -> Result<Vec<Student>, StoreError> {
        let inner = self.inner.lock().unwrap();

        let matches = |s: &Student| {
            let name_ok = filter
                .name
                .as_ref()
                .is_none_or(|n| s.name.to_lowercase().contains(&n.to_lowercase()));
            let major_ok = filter
                .major
                .as_ref()
                .is_none_or(|m| s.major.to_lowercase().contains(&m.to_lowercase()));
            let grade_ok = filter.grade.as_ref().is_none_or(|g| &s.grade == g);
            name_ok && major_ok && grade_ok
        };

        Ok(inner
            .live()
            .map(|r| &r.student)
            .filter(|s| matches(s))
            .cloned()
            .collect())
    }

    async fn update_fields(&self, id: i64, changes: &StudentUpdate) -> Result<Student, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        // Existence first, then uniqueness, matching the Postgres store
        let idx = inner
            .rows
            .iter()
            .position(|r| r.deleted_at.is_none() && r.student.id == id)
            .ok_or(StoreError::NotFound)?;

        if let Some(email) = &changes.email {
            if inner.email_taken(email, Some(id)) {
                return Err(StoreError::DuplicateEmail);
            }
        }

        let student = &mut inner.rows[idx].student;
        if let Some(name) = &changes.name {
            student.name = name.clone();
        }
        if let Some(age) = changes.age {
            student.age = age;
        }
        if let Some(gender) = &changes.gender {
            student.gender = gender.clone();
        }
        if let Some(email) = &changes.email {
            student.email = email.clone();
        }
        if let Some(phone) = &changes.phone {
            student.phone = phone.clone();
        }
        if let Some(major) = &changes.major {
            student.major = major.clone();
        }
        if let Some(grade) = &changes.grade {
            student.grade = grade.clone();
        }

        // Keep updated_at strictly increasing even on a coarse clock
        let mut now = Utc::now();
        if now <= student.updated_at {
            now = student.updated_at + Duration::microseconds(1);
        }
        student.updated_at = now;

        Ok(student.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();

        let row = inner
            .rows
            .iter_mut()
            .find(|r| r.deleted_at.is_none() && r.student.id == id)
            .ok_or(StoreError::NotFound)?;

        row.deleted_at = Some(Utc::now());

        Ok(())
    }
}
