//! Interaction entity — the ledger's edge store.
//!
//! One row per (actor, target, relation kind) fact: likes, saves, follows
//! and comment likes all live here, guarded by a unique index over
//! (`user_id`, `target_kind`, `target_id`, `kind`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What kind of entity an edge points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TargetKind {
    #[sea_orm(string_value = "post")]
    Post,
    #[sea_orm(string_value = "outfit")]
    Outfit,
    #[sea_orm(string_value = "lookbook")]
    Lookbook,
    #[sea_orm(string_value = "comment")]
    Comment,
    #[sea_orm(string_value = "user")]
    User,
}

/// The relation an actor holds to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum RelationKind {
    #[sea_orm(string_value = "like")]
    Like,
    #[sea_orm(string_value = "save")]
    Save,
    #[sea_orm(string_value = "follow")]
    Follow,
    #[sea_orm(string_value = "commentLike")]
    CommentLike,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "interaction")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The actor holding the relation
    pub user_id: String,

    pub target_kind: TargetKind,

    pub target_id: String,

    pub kind: RelationKind,

    /// Free-text collection label, only meaningful for Save edges
    #[sea_orm(nullable)]
    pub collection_name: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
