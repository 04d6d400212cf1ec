//! Student store and repository
//!
//! The store trait owns persistence: uniqueness of live emails, soft-delete
//! exclusion, id assignment. The repository sequences validation, the store
//! call, and error translation so callers see a single error taxonomy.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use tracing::info;

use common::error::DatabaseError;

use crate::models::{NewStudent, Student, StudentFilter, StudentUpdate};
use crate::validation::{self, FieldError};

const STUDENT_COLUMNS: &str =
    "id, name, age, gender, email, phone, major, grade, created_at, updated_at";

/// Storage-level failures
#[derive(Error, Debug)]
pub enum StoreError {
    /// No live row with the requested id
    #[error("student not found")]
    NotFound,

    /// Email collides with another live row
    #[error("email already exists")]
    DuplicateEmail,

    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Repository-level failures, the taxonomy handlers map to HTTP statuses
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Client-supplied data violated one or more field constraints
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// No live row with the requested id
    #[error("student not found")]
    NotFound,

    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => RepositoryError::NotFound,
            // A duplicate caught by the store (including the race where two
            // concurrent creates both pass validation) surfaces exactly like
            // a validation failure on the email field.
            StoreError::DuplicateEmail => {
                RepositoryError::Validation(vec![FieldError::new("email", "already exists")])
            }
            StoreError::Database(e) => RepositoryError::Database(e),
        }
    }
}

/// Durable storage of student rows
///
/// Every read excludes soft-deleted rows; results are ordered by id
/// ascending. Implementations enforce live-email uniqueness.
#[async_trait]
pub trait StudentStore: Clone + Send + Sync + 'static {
    async fn insert(&self, new: &NewStudent) -> Result<Student, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Student, StoreError>;

    async fn find_all(&self) -> Result<Vec<Student>, StoreError>;

    async fn search(&self, filter: &StudentFilter) -> Result<Vec<Student>, StoreError>;

    async fn update_fields(&self, id: i64, changes: &StudentUpdate) -> Result<Student, StoreError>;

    /// Not idempotent: deleting an already-deleted id is `NotFound`
    async fn soft_delete(&self, id: i64) -> Result<(), StoreError>;
}

/// PostgreSQL-backed student store
#[derive(Clone)]
pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    /// Create a new store backed by the given pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if err
        .as_database_error()
        .is_some_and(|e| e.is_unique_violation())
    {
        StoreError::DuplicateEmail
    } else {
        StoreError::Database(DatabaseError::Query(err))
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn insert(&self, new: &NewStudent) -> Result<Student, StoreError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (name, age, gender, email, phone, major, grade)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, age, gender, email, phone, major, grade, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(new.age)
        .bind(&new.gender)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.major)
        .bind(&new.grade)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(student)
    }

    async fn find_by_id(&self, id: i64) -> Result<Student, StoreError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, age, gender, email, phone, major, grade, created_at, updated_at
            FROM students
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        student.ok_or(StoreError::NotFound)
    }

    async fn find_all(&self) -> Result<Vec<Student>, StoreError> {
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, age, gender, email, phone, major, grade, created_at, updated_at
            FROM students
            WHERE deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(students)
    }

    async fn search(&self, filter: &StudentFilter) -> Result<Vec<Student>, StoreError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        query.push(STUDENT_COLUMNS);
        query.push(" FROM students WHERE deleted_at IS NULL");

        if let Some(name) = &filter.name {
            query.push(" AND name ILIKE ");
            query.push_bind(format!("%{}%", name));
        }
        if let Some(major) = &filter.major {
            query.push(" AND major ILIKE ");
            query.push_bind(format!("%{}%", major));
        }
        if let Some(grade) = &filter.grade {
            query.push(" AND grade = ");
            query.push_bind(grade.clone());
        }

        query.push(" ORDER BY id");

        let students = query
            .build_query_as::<Student>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(students)
    }

    async fn update_fields(&self, id: i64, changes: &StudentUpdate) -> Result<Student, StoreError> {
        // COALESCE keeps unset fields untouched; the partial unique index on
        // live emails re-checks uniqueness, and the row itself never
        // conflicts with its own email.
        let student = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students SET
                name = COALESCE($2, name),
                age = COALESCE($3, age),
                gender = COALESCE($4, gender),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                major = COALESCE($7, major),
                grade = COALESCE($8, grade),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, name, age, gender, email, phone, major, grade, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(changes.age)
        .bind(&changes.gender)
        .bind(&changes.email)
        .bind(&changes.phone)
        .bind(&changes.major)
        .bind(&changes.grade)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        student.ok_or(StoreError::NotFound)
    }

    async fn soft_delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

/// Student repository
#[derive(Clone)]
pub struct StudentRepository<S: StudentStore> {
    store: S,
}

impl<S: StudentStore> StudentRepository<S> {
    /// Create a new student repository
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate and persist a new student
    pub async fn create(&self, new: NewStudent) -> Result<Student, RepositoryError> {
        let errors = validation::validate_new_student(&new);
        if !errors.is_empty() {
            return Err(RepositoryError::Validation(errors));
        }

        let student = self.store.insert(&new).await?;
        info!("Created student {}", student.id);

        Ok(student)
    }

    /// Fetch a live student by id
    pub async fn get(&self, id: i64) -> Result<Student, RepositoryError> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Fetch all live students
    pub async fn list(&self) -> Result<Vec<Student>, RepositoryError> {
        Ok(self.store.find_all().await?)
    }

    /// Fetch live students matching all supplied filters
    ///
    /// Blank filter values impose no constraint, so an all-blank filter set
    /// is equivalent to `list`.
    pub async fn search(&self, filter: StudentFilter) -> Result<Vec<Student>, RepositoryError> {
        Ok(self.store.search(&filter.normalized()).await?)
    }

    /// Validate and apply a partial update
    pub async fn update(
        &self,
        id: i64,
        changes: StudentUpdate,
    ) -> Result<Student, RepositoryError> {
        let errors = validation::validate_student_update(&changes);
        if !errors.is_empty() {
            return Err(RepositoryError::Validation(errors));
        }

        let student = self.store.update_fields(id, &changes).await?;
        info!("Updated student {}", student.id);

        Ok(student)
    }

    /// Soft-delete a student
    pub async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        self.store.soft_delete(id).await?;
        info!("Deleted student {}", id);

        Ok(())
    }
}
