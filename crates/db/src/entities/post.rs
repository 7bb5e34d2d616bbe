//! Post entity (social feed posts).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Post privacy levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Privacy {
    #[sea_orm(string_value = "public")]
    Public,
    #[sea_orm(string_value = "friends")]
    Friends,
    #[sea_orm(string_value = "private")]
    Private,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The author
    pub user_id: String,

    #[sea_orm(column_type = "Text")]
    pub caption: String,

    /// Hashtags (JSON array of strings)
    pub tags: Json,

    /// Optional outfit this post showcases
    #[sea_orm(nullable)]
    pub outfit_id: Option<String>,

    pub privacy: Privacy,

    // Denormalized social counters. likes_count/saves_count are mutated
    // only by the interaction ledger; comments_count by the comment
    // service; shares_count/views_count by their endpoints.
    pub likes_count: i32,
    pub comments_count: i32,
    pub shares_count: i32,
    pub saves_count: i32,
    pub views_count: i32,

    pub is_deleted: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
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

    #[sea_orm(
        belongs_to = "super::outfit::Entity",
        from = "Column::OutfitId",
        to = "super::outfit::Column::Id",
        on_delete = "SetNull"
    )]
    Outfit,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::outfit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Outfit.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
