//! Meme service.

use chrono::Utc;
use schoolboard_common::{AppError, AppResult, UploadedFile};
use schoolboard_db::{
    entities::{
        meme::{self, MediaKind},
        meme_like,
    },
    repositories::{MemeLikeRepository, MemeRepository},
};
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::upload::{MEME_EXTENSIONS, UploadService};

/// Directory meme media is stored under.
pub const MEME_DIR: &str = "memes";

/// Meme service for business logic.
#[derive(Clone)]
pub struct MemeService {
    meme_repo: MemeRepository,
    like_repo: MemeLikeRepository,
    uploads: UploadService,
}

/// Input for posting a meme.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMemeInput {
    #[validate(length(min = 1, max = 100))]
    pub category: String,

    #[validate(length(max = 2048))]
    pub description: String,

    pub author_id: Option<i32>,
}

/// A meme as listed on the board.
#[derive(Debug, Clone, Serialize)]
pub struct MemeSummary {
    pub id: i32,
    pub category: String,
    pub url: String,
    pub media_kind: MediaKind,
    pub description: String,
    pub author_id: Option<i32>,
    pub likes: u64,
    pub created_at: String,
}

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeStatus {
    /// Whether the student likes the meme after the toggle.
    pub liked: bool,
    /// Like count after the toggle.
    pub likes: u64,
}

impl MemeService {
    /// Create a new meme service.
    #[must_use]
    pub const fn new(
        meme_repo: MemeRepository,
        like_repo: MemeLikeRepository,
        uploads: UploadService,
    ) -> Self {
        Self {
            meme_repo,
            like_repo,
            uploads,
        }
    }

    /// Public URL of a stored media file.
    #[must_use]
    pub fn media_url(&self, key: &str) -> String {
        self.uploads.public_url(key)
    }

    /// Post a meme.
    pub async fn create_meme(
        &self,
        input: CreateMemeInput,
        file: &UploadedFile,
    ) -> AppResult<meme::Model> {
        input.validate()?;

        let prefix = format!("meme_{}", input.category);
        let stored = self
            .uploads
            .accept(file, MEME_EXTENSIONS, MEME_DIR, &prefix)
            .await?;

        let model = meme::ActiveModel {
            id: NotSet,
            category: Set(input.category),
            media_kind: Set(MediaKind::from_extension(&stored.extension)),
            media_path: Set(stored.key.clone()),
            description: Set(input.description),
            author_id: Set(input.author_id),
            created_at: Set(Utc::now().into()),
        };

        match self.meme_repo.create(model).await {
            Ok(meme) => {
                tracing::info!(
                    meme_id = meme.id,
                    category = %meme.category,
                    kind = ?meme.media_kind,
                    "Meme created"
                );
                Ok(meme)
            }
            Err(e) => {
                self.uploads.discard_all([stored.key.as_str()]).await;
                Err(e)
            }
        }
    }

    /// List every meme with its like count.
    pub async fn list_memes(&self) -> AppResult<Vec<MemeSummary>> {
        let memes = self.meme_repo.find_all().await?;
        let counts = self.like_repo.count_all().await?;

        Ok(memes
            .into_iter()
            .map(|meme| MemeSummary {
                likes: counts.get(&meme.id).copied().unwrap_or(0),
                url: self.media_url(&meme.media_path),
                id: meme.id,
                category: meme.category,
                media_kind: meme.media_kind,
                description: meme.description,
                author_id: meme.author_id,
                created_at: meme.created_at.to_rfc3339(),
            })
            .collect())
    }

    /// Like the meme, or remove the like if the student already gave one.
    pub async fn toggle_like(&self, meme_id: i32, user_id: i32) -> AppResult<LikeStatus> {
        self.meme_repo.get_by_id(meme_id).await?;

        let liked = if self.like_repo.unlike(meme_id, user_id).await? {
            false
        } else {
            let model = meme_like::ActiveModel {
                id: NotSet,
                meme_id: Set(meme_id),
                user_id: Set(user_id),
                created_at: Set(Utc::now().into()),
            };
            // A concurrent duplicate still leaves the meme liked.
            self.like_repo.like(model).await?;
            true
        };

        let likes = self.like_repo.count_by_meme(meme_id).await?;
        tracing::info!(meme_id, user_id, liked, likes, "Meme like toggled");

        Ok(LikeStatus { liked, likes })
    }

    /// Delete a meme, its likes and its media file.
    pub async fn delete_meme(&self, id: i32) -> AppResult<()> {
        let meme = self.meme_repo.get_by_id(id).await?;

        if !self.meme_repo.delete_with_likes(id).await? {
            return Err(AppError::NotFound(format!("Meme {id}")));
        }

        self.uploads.discard_all([meme.media_path.as_str()]).await;
        tracing::info!(meme_id = id, "Meme deleted");
        Ok(())
    }
}
