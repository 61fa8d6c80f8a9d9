//! Meme and meme like repositories.

use std::{collections::HashMap, sync::Arc};

use crate::entities::{Meme, MemeLike, meme, meme_like};
use schoolboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use super::map_insert_error;

/// Meme repository for database operations.
#[derive(Clone)]
pub struct MemeRepository {
    db: Arc<DatabaseConnection>,
}

impl MemeRepository {
    /// Create a new meme repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a meme by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<meme::Model>> {
        Meme::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a meme by ID, returning error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<meme::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Meme {id}")))
    }

    /// List all memes ordered by ID.
    pub async fn find_all(&self) -> AppResult<Vec<meme::Model>> {
        Meme::find()
            .order_by_asc(meme::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new meme.
    pub async fn create(&self, model: meme::ActiveModel) -> AppResult<meme::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a meme together with all of its likes in one transaction.
    ///
    /// Returns whether the meme row existed.
    pub async fn delete_with_likes(&self, id: i32) -> AppResult<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        MemeLike::delete_many()
            .filter(meme_like::Column::MemeId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let deleted = Meme::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(deleted.rows_affected > 0)
    }
}

/// Meme like repository for database operations.
#[derive(Clone)]
pub struct MemeLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl MemeLikeRepository {
    /// Create a new meme like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Like a meme.
    ///
    /// Returns `false` if the like already existed, which the
    /// `(meme_id, user_id)` unique index reports on insert.
    pub async fn like(&self, model: meme_like::ActiveModel) -> AppResult<bool> {
        match model.insert(self.db.as_ref()).await {
            Ok(_) => Ok(true),
            Err(e) => match map_insert_error(e, String::new) {
                AppError::Conflict(_) => Ok(false),
                other => Err(other),
            },
        }
    }

    /// Unlike a meme. Returns whether a like was removed.
    pub async fn unlike(&self, meme_id: i32, user_id: i32) -> AppResult<bool> {
        let deleted = MemeLike::delete_many()
            .filter(meme_like::Column::MemeId.eq(meme_id))
            .filter(meme_like::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(deleted.rows_affected > 0)
    }

    /// Count likes on a meme.
    pub async fn count_by_meme(&self, meme_id: i32) -> AppResult<u64> {
        MemeLike::find()
            .filter(meme_like::Column::MemeId.eq(meme_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count likes for every meme that has at least one.
    pub async fn count_all(&self) -> AppResult<HashMap<i32, u64>> {
        let likes = MemeLike::find()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut counts = HashMap::new();
        for like in likes {
            *counts.entry(like.meme_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::meme::MediaKind;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_meme(id: i32) -> meme::Model {
        meme::Model {
            id,
            category: "fun".to_string(),
            media_path: format!("memes/meme_fun_{id}.gif"),
            media_kind: MediaKind::Animation,
            description: "lol".to_string(),
            author_id: Some(7),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_like(id: i32, meme_id: i32, user_id: i32) -> meme_like::Model {
        meme_like::Model {
            id,
            meme_id,
            user_id,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let meme = create_test_meme(1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[meme.clone()]])
                .into_connection(),
        );

        let repo = MemeRepository::new(db);
        let result = repo.get_by_id(1).await.unwrap();

        assert_eq!(result.media_kind, MediaKind::Animation);
        assert_eq!(result.author_id, Some(7));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<meme::Model>::new()])
                .into_connection(),
        );

        let repo = MemeRepository::new(db);
        assert!(matches!(repo.get_by_id(9).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_count_all_groups_by_meme() {
        let likes = vec![
            create_test_like(1, 1, 10),
            create_test_like(2, 1, 11),
            create_test_like(3, 2, 10),
        ];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([likes])
                .into_connection(),
        );

        let repo = MemeLikeRepository::new(db);
        let counts = repo.count_all().await.unwrap();

        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&1));
        assert_eq!(counts.get(&3), None);
    }

    #[tokio::test]
    async fn test_unlike_reports_removal() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let repo = MemeLikeRepository::new(db);
        assert!(repo.unlike(1, 10).await.unwrap());
        assert!(!repo.unlike(1, 10).await.unwrap());
    }
}
