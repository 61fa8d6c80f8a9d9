//! Repositories wrapping the sea-orm entities.

mod meme;
mod poll;
mod student;

pub use meme::{MemeLikeRepository, MemeRepository};
pub use poll::{ChoiceRepository, PollRepository};
pub use student::StudentRepository;

use schoolboard_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Map an insert failure, turning unique-index violations into `Conflict`.
pub(crate) fn map_insert_error(err: DbErr, conflict: impl FnOnce() -> String) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(conflict()),
        _ => AppError::Database(err.to_string()),
    }
}
