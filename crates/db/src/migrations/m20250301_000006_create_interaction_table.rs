//! Create interaction table migration.
//!
//! One table holds every ledger edge. The unique index over
//! (user_id, target_kind, target_id, kind) is what makes concurrent
//! first toggles on the same edge collide instead of double-writing.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Interaction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Interaction::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Interaction::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Interaction::TargetKind)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Interaction::TargetId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Interaction::Kind).string_len(20).not_null())
                    .col(ColumnDef::new(Interaction::CollectionName).string_len(128))
                    .col(
                        ColumnDef::new(Interaction::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interaction_user")
                            .from(Interaction::Table, Interaction::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one edge per (actor, target, kind)
        manager
            .create_index(
                Index::create()
                    .name("idx_interaction_edge")
                    .table(Interaction::Table)
                    .col(Interaction::UserId)
                    .col(Interaction::TargetKind)
                    .col(Interaction::TargetId)
                    .col(Interaction::Kind)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (target_kind, target_id, kind) for edge counts and
        // follower listings
        manager
            .create_index(
                Index::create()
                    .name("idx_interaction_target")
                    .table(Interaction::Table)
                    .col(Interaction::TargetKind)
                    .col(Interaction::TargetId)
                    .col(Interaction::Kind)
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, kind) for listing an actor's edges of one
        // kind, e.g. who a user follows
        manager
            .create_index(
                Index::create()
                    .name("idx_interaction_user_kind")
                    .table(Interaction::Table)
                    .col(Interaction::UserId)
                    .col(Interaction::Kind)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Interaction::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Interaction {
    Table,
    Id,
    UserId,
    TargetKind,
    TargetId,
    Kind,
    CollectionName,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
