//! Create meme and meme_like tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Meme::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Meme::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Meme::Category).string_len(256).not_null())
                    .col(ColumnDef::new(Meme::MediaPath).string_len(512).not_null())
                    .col(ColumnDef::new(Meme::MediaKind).string_len(16).not_null())
                    .col(ColumnDef::new(Meme::Description).text().not_null())
                    .col(ColumnDef::new(Meme::AuthorId).integer().null())
                    .col(
                        ColumnDef::new(Meme::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MemeLike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MemeLike::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MemeLike::MemeId).integer().not_null())
                    .col(ColumnDef::new(MemeLike::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(MemeLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meme_like_meme")
                            .from(MemeLike::Table, MemeLike::MemeId)
                            .to(Meme::Table, Meme::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (meme_id, user_id) - one like per student per meme
        manager
            .create_index(
                Index::create()
                    .name("idx_meme_like_meme_user")
                    .table(MemeLike::Table)
                    .col(MemeLike::MemeId)
                    .col(MemeLike::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MemeLike::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Meme::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Meme {
    Table,
    Id,
    Category,
    MediaPath,
    MediaKind,
    Description,
    AuthorId,
    CreatedAt,
}

#[derive(Iden)]
enum MemeLike {
    Table,
    Id,
    MemeId,
    UserId,
    CreatedAt,
}
