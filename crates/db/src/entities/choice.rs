//! Choice entity: one student's vote on one poll.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "choice")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Poll that was voted on.
    #[sea_orm(indexed)]
    pub poll_id: i32,

    /// Student who voted. Not a foreign key: votes outlive deleted students.
    #[sea_orm(indexed)]
    pub user_id: i32,

    /// Chosen photo slot (1-based).
    pub photo_choice: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::poll::Entity",
        from = "Column::PollId",
        to = "super::poll::Column::Id",
        on_delete = "Cascade"
    )]
    Poll,
}

impl Related<super::poll::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Poll.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
