//! Create lookbook table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lookbook::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lookbook::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Lookbook::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Lookbook::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Lookbook::Description).text())
                    .col(
                        ColumnDef::new(Lookbook::IsPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Lookbook::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Lookbook::LikesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Lookbook::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Lookbook::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lookbook_user")
                            .from(Lookbook::Table, Lookbook::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a user's lookbooks)
        manager
            .create_index(
                Index::create()
                    .name("idx_lookbook_user_id")
                    .table(Lookbook::Table)
                    .col(Lookbook::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lookbook::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Lookbook {
    Table,
    Id,
    UserId,
    Title,
    Description,
    IsPublic,
    IsFeatured,
    LikesCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
