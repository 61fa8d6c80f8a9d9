//! Meme entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of media a meme carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image (jpg, jpeg, png).
    #[sea_orm(string_value = "image")]
    Image,
    /// Animated image (gif).
    #[sea_orm(string_value = "animation")]
    Animation,
    /// Video (mp4, webm, avi, mov).
    #[sea_orm(string_value = "video")]
    Video,
}

impl MediaKind {
    /// Classify a lower-cased file extension.
    #[must_use]
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "gif" => Self::Animation,
            "mp4" | "webm" | "avi" | "mov" => Self::Video,
            _ => Self::Image,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meme")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub category: String,

    /// Storage key of the media file.
    pub media_path: String,

    pub media_kind: MediaKind,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Student who posted the meme, if known.
    #[sea_orm(nullable)]
    pub author_id: Option<i32>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::meme_like::Entity")]
    MemeLike,
}

impl Related<super::meme_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MemeLike.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
