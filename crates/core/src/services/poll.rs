//! Poll service.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use schoolboard_common::{AppError, AppResult, StoredFile, UploadedFile};
use schoolboard_db::{
    entities::{choice, poll},
    repositories::{ChoiceRepository, PollRepository},
};
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::upload::{PHOTO_EXTENSIONS, PlannedUpload, UploadService};

/// Directory poll photos are stored under.
pub const POLL_DIR: &str = "votes";

/// Poll service for business logic.
#[derive(Clone)]
pub struct PollService {
    poll_repo: PollRepository,
    choice_repo: ChoiceRepository,
    uploads: UploadService,
}

/// Input for creating a poll.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePollInput {
    #[validate(length(min = 1, max = 100))]
    pub category: String,
}

impl CreatePollInput {
    /// Create poll input for a category.
    #[must_use]
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }
}

/// A poll with its tallied results.
#[derive(Debug, Clone, Serialize)]
pub struct PollSummary {
    pub id: i32,
    pub category: String,
    pub photo1_path: String,
    pub photo2_path: String,
    pub photo3_path: Option<String>,
    pub created_at: String,
    /// Vote count per photo slot, always keyed 1, 2 and 3.
    pub results: BTreeMap<i32, u64>,
    pub total_votes: u64,
}

impl PollService {
    /// Create a new poll service.
    #[must_use]
    pub const fn new(
        poll_repo: PollRepository,
        choice_repo: ChoiceRepository,
        uploads: UploadService,
    ) -> Self {
        Self {
            poll_repo,
            choice_repo,
            uploads,
        }
    }

    /// Public URL of a stored photo.
    #[must_use]
    pub fn photo_url(&self, key: &str) -> String {
        self.uploads.public_url(key)
    }

    /// Create a poll from two or three photos.
    ///
    /// Every photo is checked and named before anything is written; a failed
    /// write or insert removes the photos written by this call.
    pub async fn create_poll(
        &self,
        input: CreatePollInput,
        photos: &[UploadedFile],
    ) -> AppResult<poll::Model> {
        input.validate()?;
        let category = input.category;

        if !(2..=3).contains(&photos.len()) {
            return Err(AppError::Validation(format!(
                "A poll needs 2 or 3 photos, got {}",
                photos.len()
            )));
        }

        let timestamp = Utc::now().timestamp();
        let mut planned: Vec<PlannedUpload> = Vec::with_capacity(photos.len());
        for (slot, photo) in (1..).zip(photos) {
            let prefix = format!("{category}_photo{slot}");
            let upload = self
                .uploads
                .plan(photo, PHOTO_EXTENSIONS, POLL_DIR, &prefix, timestamp)
                .map_err(|e| slot_error(slot, e))?;
            planned.push(upload);
        }

        let mut stored: Vec<StoredFile> = Vec::with_capacity(photos.len());
        for (photo, upload) in photos.iter().zip(planned) {
            match self.uploads.store(photo, upload).await {
                Ok(file) => stored.push(file),
                Err(e) => {
                    self.uploads
                        .discard_all(stored.iter().map(|f| f.key.as_str()).collect::<Vec<_>>())
                        .await;
                    return Err(e);
                }
            }
        }

        let mut keys = stored.iter().map(|f| f.key.clone());
        let model = poll::ActiveModel {
            id: NotSet,
            category: Set(category),
            photo1_path: Set(keys.next().unwrap_or_default()),
            photo2_path: Set(keys.next().unwrap_or_default()),
            photo3_path: Set(keys.next()),
            created_at: Set(Utc::now().into()),
        };

        match self.poll_repo.create(model).await {
            Ok(poll) => {
                tracing::info!(
                    poll_id = poll.id,
                    category = %poll.category,
                    photos = stored.len(),
                    "Poll created"
                );
                Ok(poll)
            }
            Err(e) => {
                self.uploads
                    .discard_all(stored.iter().map(|f| f.key.as_str()).collect::<Vec<_>>())
                    .await;
                Err(e)
            }
        }
    }

    /// Cast a student's single vote on a poll.
    pub async fn cast_choice(
        &self,
        poll_id: i32,
        user_id: i32,
        photo_choice: i32,
    ) -> AppResult<choice::Model> {
        let poll = self.poll_repo.get_by_id(poll_id).await?;

        if !(1..=3).contains(&photo_choice) {
            return Err(AppError::Validation("Choose photo 1, 2 or 3".to_string()));
        }
        if photo_choice > poll.slot_count() {
            return Err(AppError::Validation(format!(
                "Poll {poll_id} has no photo {photo_choice}"
            )));
        }

        let model = choice::ActiveModel {
            id: NotSet,
            poll_id: Set(poll_id),
            user_id: Set(user_id),
            photo_choice: Set(photo_choice),
            created_at: Set(Utc::now().into()),
        };

        let choice = self.choice_repo.create(model).await?;
        tracing::info!(poll_id, user_id, photo_choice, "Vote cast");
        Ok(choice)
    }

    /// List every poll with its results.
    pub async fn list_polls(&self) -> AppResult<Vec<PollSummary>> {
        let polls = self.poll_repo.find_all().await?;
        let choices = self.choice_repo.find_all().await?;

        let mut tallies: HashMap<i32, BTreeMap<i32, u64>> = HashMap::new();
        for choice in choices {
            *tallies
                .entry(choice.poll_id)
                .or_default()
                .entry(choice.photo_choice)
                .or_insert(0) += 1;
        }

        Ok(polls
            .into_iter()
            .map(|poll| {
                let mut results: BTreeMap<i32, u64> = (1..=3).map(|slot| (slot, 0)).collect();
                if let Some(tally) = tallies.remove(&poll.id) {
                    results.extend(tally);
                }
                let total_votes = results.values().sum();

                PollSummary {
                    id: poll.id,
                    category: poll.category,
                    photo1_path: self.photo_url(&poll.photo1_path),
                    photo2_path: self.photo_url(&poll.photo2_path),
                    photo3_path: poll.photo3_path.as_deref().map(|p| self.photo_url(p)),
                    created_at: poll.created_at.to_rfc3339(),
                    results,
                    total_votes,
                }
            })
            .collect())
    }

    /// Delete a poll, its votes and its photos.
    pub async fn delete_poll(&self, id: i32) -> AppResult<()> {
        let poll = self.poll_repo.get_by_id(id).await?;

        if !self.poll_repo.delete_with_choices(id).await? {
            return Err(AppError::NotFound(format!("Poll {id}")));
        }

        self.uploads.discard_all(poll.photo_paths()).await;
        tracing::info!(poll_id = id, "Poll deleted");
        Ok(())
    }
}

fn slot_error(slot: usize, err: AppError) -> AppError {
    match err {
        AppError::Validation(msg) => AppError::Validation(format!("Photo {slot}: {msg}")),
        other => other,
    }
}
