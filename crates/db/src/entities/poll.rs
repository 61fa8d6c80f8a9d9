//! Poll entity: a category with two or three competing photos.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "poll")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub category: String,

    /// Storage key of the first photo.
    pub photo1_path: String,

    /// Storage key of the second photo.
    pub photo2_path: String,

    /// Storage key of the optional third photo.
    #[sea_orm(nullable)]
    pub photo3_path: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Number of photo slots in use (2 or 3).
    #[must_use]
    pub const fn slot_count(&self) -> i32 {
        if self.photo3_path.is_some() { 3 } else { 2 }
    }

    /// Storage keys of all photos in slot order.
    #[must_use]
    pub fn photo_paths(&self) -> Vec<&str> {
        let mut paths = vec![self.photo1_path.as_str(), self.photo2_path.as_str()];
        if let Some(path) = &self.photo3_path {
            paths.push(path.as_str());
        }
        paths
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::choice::Entity")]
    Choice,
}

impl Related<super::choice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Choice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
