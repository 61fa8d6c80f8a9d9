//! Meme like entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Meme like - a record of a student liking a meme.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meme_like")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Meme that was liked.
    #[sea_orm(indexed)]
    pub meme_id: i32,

    /// Student who liked the meme.
    #[sea_orm(indexed)]
    pub user_id: i32,

    /// When the like was created.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::meme::Entity",
        from = "Column::MemeId",
        to = "super::meme::Column::Id",
        on_delete = "Cascade"
    )]
    Meme,
}

impl Related<super::meme::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meme.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
