//! Student endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use schoolboard_common::AppResult;
use schoolboard_core::{StudentInput, StudentProfile};
use schoolboard_db::entities::student;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AdminAccess, QueryParams},
    middleware::AppState,
    response::MessageResponse,
};

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: i32,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: i32,
    pub name: String,
    pub grade: i32,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all_users", get(all_users))
        .route("/profile/{id}", get(profile))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/delete_users", post(delete_user))
}

/// List all students.
async fn all_users(State(state): State<AppState>) -> AppResult<Json<Vec<student::Model>>> {
    let students = state.student_service.list_all().await?;
    Ok(Json(students))
}

/// Show a student and the votes they cast.
async fn profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<StudentProfile>> {
    let profile = state.student_service.profile(id).await?;
    Ok(Json(profile))
}

/// Register a student.
async fn register(
    State(state): State<AppState>,
    QueryParams(input): QueryParams<StudentInput>,
) -> AppResult<Json<student::Model>> {
    let student = state.student_service.register(input).await?;
    Ok(Json(student))
}

/// Log in by name and grade.
async fn login(
    State(state): State<AppState>,
    QueryParams(input): QueryParams<StudentInput>,
) -> AppResult<Json<LoginResponse>> {
    let student = state.student_service.login(&input).await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user_id: student.id,
        name: student.name,
        grade: student.grade,
    }))
}

/// Delete a student (admin only).
async fn delete_user(
    _admin: AdminAccess,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DeleteQuery>,
) -> AppResult<Json<MessageResponse>> {
    state.student_service.delete(query.id).await?;
    Ok(MessageResponse::json("Student deleted"))
}
