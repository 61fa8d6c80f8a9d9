//! Meme board endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    routing::{delete, get, post},
};
use schoolboard_common::AppResult;
use schoolboard_core::{CreateMemeInput, LikeStatus, MemeSummary};
use schoolboard_db::entities::meme::MediaKind;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AdminAccess, QueryParams, read_files, require_file},
    middleware::AppState,
    response::MessageResponse,
};

const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct CreateMemeQuery {
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub user_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LikeQuery {
    pub user_id: i32,
}

#[derive(Debug, Serialize)]
pub struct MemeCreatedResponse {
    pub message: String,
    pub meme_id: i32,
    pub url: String,
    pub category: String,
    pub description: String,
    pub media_kind: MediaKind,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_meme))
        .route("/all", get(list_memes))
        .route("/{id}/like", post(like_meme))
        .route("/delete/{id}", delete(delete_meme))
}

/// Post a meme.
async fn add_meme(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<CreateMemeQuery>,
    mut multipart: Multipart,
) -> AppResult<Json<MemeCreatedResponse>> {
    let mut files = read_files(&mut multipart, &[FILE_FIELD]).await?;
    let file = require_file(&mut files, FILE_FIELD)?;

    let input = CreateMemeInput {
        category: query.category,
        description: query.description,
        author_id: query.user_id,
    };
    let meme = state.meme_service.create_meme(input, &file).await?;

    Ok(Json(MemeCreatedResponse {
        message: "Meme added".to_string(),
        meme_id: meme.id,
        url: state.meme_service.media_url(&meme.media_path),
        category: meme.category,
        description: meme.description,
        media_kind: meme.media_kind,
    }))
}

/// List all memes with their likes.
async fn list_memes(State(state): State<AppState>) -> AppResult<Json<Vec<MemeSummary>>> {
    let memes = state.meme_service.list_memes().await?;
    Ok(Json(memes))
}

/// Toggle a student's like on a meme.
async fn like_meme(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    QueryParams(query): QueryParams<LikeQuery>,
) -> AppResult<Json<LikeStatus>> {
    let status = state.meme_service.toggle_like(id, query.user_id).await?;
    Ok(Json(status))
}

/// Delete a meme, its likes and its file (admin only).
async fn delete_meme(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.meme_service.delete_meme(id).await?;
    Ok(MessageResponse::json("Meme deleted"))
}
