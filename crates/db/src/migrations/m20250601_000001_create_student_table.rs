//! Create student table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Student::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Student::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Student::Grade).integer().not_null())
                    .col(
                        ColumnDef::new(Student::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (name, grade) for login lookups. Not unique.
        manager
            .create_index(
                Index::create()
                    .name("idx_student_name_grade")
                    .table(Student::Table)
                    .col(Student::Name)
                    .col(Student::Grade)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Student {
    Table,
    Id,
    Name,
    Grade,
    CreatedAt,
}
