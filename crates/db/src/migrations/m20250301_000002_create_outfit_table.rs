//! Create outfit table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Outfit::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Outfit::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Outfit::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Outfit::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Outfit::Description).text())
                    .col(ColumnDef::new(Outfit::Occasion).string_len(64))
                    .col(ColumnDef::new(Outfit::Season).string_len(64))
                    .col(
                        ColumnDef::new(Outfit::IsPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Outfit::LikesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Outfit::SavesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Outfit::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Outfit::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_outfit_user")
                            .from(Outfit::Table, Outfit::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a user's outfits)
        manager
            .create_index(
                Index::create()
                    .name("idx_outfit_user_id")
                    .table(Outfit::Table)
                    .col(Outfit::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Outfit::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Outfit {
    Table,
    Id,
    UserId,
    Name,
    Description,
    Occasion,
    Season,
    IsPublic,
    LikesCount,
    SavesCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
