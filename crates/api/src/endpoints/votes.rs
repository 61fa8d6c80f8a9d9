//! Photo poll endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    routing::{get, post},
};
use schoolboard_common::AppResult;
use schoolboard_core::{CreatePollInput, PollSummary};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AdminAccess, QueryParams, read_files, require_file},
    middleware::AppState,
    response::MessageResponse,
};

/// Multipart field names of the photo slots, in slot order.
const PHOTO_FIELDS: [&str; 3] = ["photo1", "photo2", "photo3"];

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: i32,
}

#[derive(Debug, Deserialize)]
pub struct CastQuery {
    pub photo_choice: i32,
    pub user_id: i32,
}

#[derive(Debug, Serialize)]
pub struct PollCreatedResponse {
    pub message: String,
    pub vote_id: i32,
    pub category: String,
    pub photos: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct VoteCastResponse {
    pub message: String,
    pub your_choice: i32,
    /// ID of the recorded vote.
    pub vote_id: i32,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add_votes", post(add_poll))
        .route("/get_votes", get(list_polls))
        .route("/delete_votes", post(delete_poll))
        .route("/{id}/vote", post(cast_vote))
}

/// Create a poll from two or three uploaded photos.
async fn add_poll(
    State(state): State<AppState>,
    QueryParams(input): QueryParams<CreatePollInput>,
    mut multipart: Multipart,
) -> AppResult<Json<PollCreatedResponse>> {
    let mut files = read_files(&mut multipart, &PHOTO_FIELDS).await?;

    let mut photos = vec![
        require_file(&mut files, PHOTO_FIELDS[0])?,
        require_file(&mut files, PHOTO_FIELDS[1])?,
    ];
    if let Some(third) = files.remove(PHOTO_FIELDS[2]) {
        photos.push(third);
    }

    let poll = state.poll_service.create_poll(input, &photos).await?;

    let photos = poll
        .photo_paths()
        .into_iter()
        .map(|key| state.poll_service.photo_url(key))
        .collect::<Vec<_>>();

    Ok(Json(PollCreatedResponse {
        message: format!("Poll created with {} photos", photos.len()),
        vote_id: poll.id,
        category: poll.category,
        photos,
    }))
}

/// List all polls with their results.
async fn list_polls(State(state): State<AppState>) -> AppResult<Json<Vec<PollSummary>>> {
    let polls = state.poll_service.list_polls().await?;
    Ok(Json(polls))
}

/// Delete a poll, its votes and photos (admin only).
async fn delete_poll(
    _admin: AdminAccess,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DeleteQuery>,
) -> AppResult<Json<MessageResponse>> {
    state.poll_service.delete_poll(query.id).await?;
    Ok(MessageResponse::json("Poll deleted with its files"))
}

/// Cast a vote on a poll.
async fn cast_vote(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    QueryParams(query): QueryParams<CastQuery>,
) -> AppResult<Json<VoteCastResponse>> {
    let choice = state
        .poll_service
        .cast_choice(id, query.user_id, query.photo_choice)
        .await?;

    Ok(Json(VoteCastResponse {
        message: "Vote counted".to_string(),
        your_choice: choice.photo_choice,
        vote_id: choice.id,
    }))
}
