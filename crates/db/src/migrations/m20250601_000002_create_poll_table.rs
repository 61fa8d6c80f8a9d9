//! Create poll and choice tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Poll::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Poll::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Poll::Category).string_len(256).not_null())
                    .col(ColumnDef::new(Poll::Photo1Path).string_len(512).not_null())
                    .col(ColumnDef::new(Poll::Photo2Path).string_len(512).not_null())
                    .col(ColumnDef::new(Poll::Photo3Path).string_len(512).null())
                    .col(
                        ColumnDef::new(Poll::CreatedAt)
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
                    .table(Choice::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Choice::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Choice::PollId).integer().not_null())
                    .col(ColumnDef::new(Choice::UserId).integer().not_null())
                    .col(ColumnDef::new(Choice::PhotoChoice).integer().not_null())
                    .col(
                        ColumnDef::new(Choice::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_choice_poll")
                            .from(Choice::Table, Choice::PollId)
                            .to(Poll::Table, Poll::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (poll_id, user_id) - one vote per student per poll
        manager
            .create_index(
                Index::create()
                    .name("idx_choice_poll_user")
                    .table(Choice::Table)
                    .col(Choice::PollId)
                    .col(Choice::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for student profiles)
        manager
            .create_index(
                Index::create()
                    .name("idx_choice_user_id")
                    .table(Choice::Table)
                    .col(Choice::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Choice::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Poll::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Poll {
    Table,
    Id,
    Category,
    #[iden = "photo1_path"]
    Photo1Path,
    #[iden = "photo2_path"]
    Photo2Path,
    #[iden = "photo3_path"]
    Photo3Path,
    CreatedAt,
}

#[derive(Iden)]
enum Choice {
    Table,
    Id,
    PollId,
    UserId,
    PhotoChoice,
    CreatedAt,
}
