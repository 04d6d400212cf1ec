//! Student API routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    models::{NewStudent, StudentFilter, StudentListResponse, StudentUpdate},
    repositories::StudentStore,
    state::AppState,
};

/// Create the router for the student API
pub fn create_router<S: StudentStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/v1/students",
            get(list_students::<S>).post(create_student::<S>),
        )
        .route("/api/v1/students/search", get(search_students::<S>))
        .route(
            "/api/v1/students/:id",
            get(get_student::<S>)
                .put(update_student::<S>)
                .delete(delete_student::<S>),
        )
        .with_state(state)
}

/// Ids are positive integers; anything else is a client error
fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ApiError::BadRequest("Invalid student ID"))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "student-api"
    }))
}

/// Get all students
pub async fn list_students<S: StudentStore>(
    State(state): State<AppState<S>>,
) -> ApiResult<impl IntoResponse> {
    let students = state.students.list().await?;

    Ok(Json(StudentListResponse {
        count: students.len(),
        data: students,
    }))
}

/// Search students by name, major, and grade
pub async fn search_students<S: StudentStore>(
    State(state): State<AppState<S>>,
    Query(filter): Query<StudentFilter>,
) -> ApiResult<impl IntoResponse> {
    let students = state.students.search(filter).await?;

    Ok(Json(StudentListResponse {
        count: students.len(),
        data: students,
    }))
}

/// Get a student by ID
pub async fn get_student<S: StudentStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let student = state.students.get(parse_id(&id)?).await?;

    Ok(Json(json!({ "data": student })))
}

/// Create a new student
pub async fn create_student<S: StudentStore>(
    State(state): State<AppState<S>>,
    Json(payload): Json<NewStudent>,
) -> ApiResult<impl IntoResponse> {
    let student = state.students.create(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Student created successfully",
            "data": student,
        })),
    ))
}

/// Update a student
pub async fn update_student<S: StudentStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(payload): Json<StudentUpdate>,
) -> ApiResult<impl IntoResponse> {
    let student = state.students.update(parse_id(&id)?, payload).await?;

    Ok(Json(json!({
        "message": "Student updated successfully",
        "data": student,
    })))
}

/// Delete a student
pub async fn delete_student<S: StudentStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.students.delete(parse_id(&id)?).await?;

    Ok(Json(json!({
        "message": "Student deleted successfully",
    })))
}
