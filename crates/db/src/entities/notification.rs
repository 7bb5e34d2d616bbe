//! Notification entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum NotificationType {
    #[sea_orm(string_value = "follow")]
    Follow,
    #[sea_orm(string_value = "like")]
    Like,
    #[sea_orm(string_value = "save")]
    Save,
    #[sea_orm(string_value = "comment")]
    Comment,
    #[sea_orm(string_value = "commentLike")]
    CommentLike,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user receiving the notification
    pub notifiee_id: String,

    /// The user who triggered it (None for system notifications)
    #[sea_orm(nullable)]
    pub notifier_id: Option<String>,

    #[sea_orm(column_name = "type")]
    pub notification_type: NotificationType,

    #[sea_orm(nullable)]
    pub post_id: Option<String>,

    #[sea_orm(nullable)]
    pub comment_id: Option<String>,

    pub is_read: bool,

    #[sea_orm(nullable)]
    pub read_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::NotifieeId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Notifiee,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifiee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
