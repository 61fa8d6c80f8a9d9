//! Student entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A registered student. `(name, grade)` is not unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Display name, 1 to 50 characters.
    #[sea_orm(indexed)]
    pub name: String,

    /// School grade, 1 to 11.
    pub grade: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
