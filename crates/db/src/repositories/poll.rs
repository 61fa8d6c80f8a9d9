//! Poll and choice repositories.

use std::sync::Arc;

use crate::entities::{Choice, Poll, choice, poll};
use schoolboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use super::map_insert_error;

/// Poll repository for database operations.
#[derive(Clone)]
pub struct PollRepository {
    db: Arc<DatabaseConnection>,
}

impl PollRepository {
    /// Create a new poll repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a poll by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<poll::Model>> {
        Poll::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a poll by ID, returning error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<poll::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Poll {id}")))
    }

    /// Find polls by IDs.
    pub async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<poll::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Poll::find()
            .filter(poll::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all polls ordered by ID.
    pub async fn find_all(&self) -> AppResult<Vec<poll::Model>> {
        Poll::find()
            .order_by_asc(poll::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new poll.
    pub async fn create(&self, model: poll::ActiveModel) -> AppResult<poll::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a poll together with all of its choices in one transaction.
    ///
    /// Returns whether the poll row existed.
    pub async fn delete_with_choices(&self, id: i32) -> AppResult<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Choice::delete_many()
            .filter(choice::Column::PollId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let deleted = Poll::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(deleted.rows_affected > 0)
    }
}

/// Choice repository for database operations.
#[derive(Clone)]
pub struct ChoiceRepository {
    db: Arc<DatabaseConnection>,
}

impl ChoiceRepository {
    /// Create a new choice repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a vote.
    ///
    /// The `(poll_id, user_id)` unique index rejects a second vote; that
    /// surfaces as `Conflict`.
    pub async fn create(&self, model: choice::ActiveModel) -> AppResult<choice::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            map_insert_error(e, || "Student has already voted on this poll".to_string())
        })
    }

    /// Get all votes cast by a student, oldest first.
    pub async fn find_by_user(&self, user_id: i32) -> AppResult<Vec<choice::Model>> {
        Choice::find()
            .filter(choice::Column::UserId.eq(user_id))
            .order_by_asc(choice::Column::CreatedAt)
            .order_by_asc(choice::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get every vote on every poll.
    pub async fn find_all(&self) -> AppResult<Vec<choice::Model>> {
        Choice::find()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_poll(id: i32, photo3: bool) -> poll::Model {
        poll::Model {
            id,
            category: "Sport".to_string(),
            photo1_path: format!("votes/Sport_photo1_{id}.jpg"),
            photo2_path: format!("votes/Sport_photo2_{id}.png"),
            photo3_path: photo3.then(|| format!("votes/Sport_photo3_{id}.jpg")),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_choice(id: i32, poll_id: i32, user_id: i32, photo_choice: i32) -> choice::Model {
        choice::Model {
            id,
            poll_id,
            user_id,
            photo_choice,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<poll::Model>::new()])
                .into_connection(),
        );

        let repo = PollRepository::new(db);
        let result = repo.get_by_id(7).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_all_returns_polls() {
        let polls = vec![create_test_poll(1, true), create_test_poll(2, false)];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([polls.clone()])
                .into_connection(),
        );

        let repo = PollRepository::new(db);
        let result = repo.find_all().await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].slot_count(), 3);
        assert_eq!(result[1].slot_count(), 2);
        assert_eq!(result[1].photo_paths().len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_ids_empty_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = PollRepository::new(db);
        let result = repo.find_by_ids(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_delete_with_choices() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 3,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let repo = PollRepository::new(db);
        assert!(repo.delete_with_choices(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let votes = vec![
            create_test_choice(1, 1, 5, 2),
            create_test_choice(4, 3, 5, 1),
        ];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([votes])
                .into_connection(),
        );

        let repo = ChoiceRepository::new(db);
        let result = repo.find_by_user(5).await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|c| c.user_id == 5));
    }
}
