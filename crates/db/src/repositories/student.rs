//! Student repository.

use std::sync::Arc;

use crate::entities::{Student, student};
use schoolboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Student repository for database operations.
#[derive(Clone)]
pub struct StudentRepository {
    db: Arc<DatabaseConnection>,
}

impl StudentRepository {
    /// Create a new student repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a student by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<student::Model>> {
        Student::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a student by ID, returning error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<student::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student {id}")))
    }

    /// Find the oldest student registered with this exact name and grade.
    pub async fn find_first_by_name_and_grade(
        &self,
        name: &str,
        grade: i32,
    ) -> AppResult<Option<student::Model>> {
        Student::find()
            .filter(student::Column::Name.eq(name))
            .filter(student::Column::Grade.eq(grade))
            .order_by_asc(student::Column::Id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all students ordered by ID.
    pub async fn find_all(&self) -> AppResult<Vec<student::Model>> {
        Student::find()
            .order_by_asc(student::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new student.
    pub async fn create(&self, model: student::ActiveModel) -> AppResult<student::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a student. Returns whether a row was removed.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = Student::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }
}
