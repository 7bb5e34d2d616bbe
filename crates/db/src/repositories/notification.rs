//! Notification repository.

use std::sync::Arc;

use crate::entities::{Notification, notification};
use curator_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Notification repository for database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new notification.
    pub async fn create(
        &self,
        model: notification::ActiveModel,
    ) -> AppResult<notification::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a notification by id, scoped to its recipient.
    pub async fn find_for_notifiee(
        &self,
        id: &str,
        notifiee_id: &str,
    ) -> AppResult<Option<notification::Model>> {
        Notification::find_by_id(id)
            .filter(notification::Column::NotifieeId.eq(notifiee_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Notifications for a user, newest first (paginated).
    pub async fn find_by_notifiee(
        &self,
        notifiee_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<notification::Model>> {
        let mut query = Notification::find()
            .filter(notification::Column::NotifieeId.eq(notifiee_id))
            .order_by_desc(notification::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(notification::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark a single notification as read.
    pub async fn mark_read(&self, id: &str, notifiee_id: &str) -> AppResult<()> {
        Notification::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .col_expr(
                notification::Column::ReadAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::NotifieeId.eq(notifiee_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Mark every unread notification for a user as read.
    pub async fn mark_all_read(&self, notifiee_id: &str) -> AppResult<()> {
        Notification::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .col_expr(
                notification::Column::ReadAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(notification::Column::NotifieeId.eq(notifiee_id))
            .filter(notification::Column::IsRead.eq(false))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count unread notifications for a user.
    pub async fn count_unread(&self, notifiee_id: &str) -> AppResult<u64> {
        Notification::find()
            .filter(notification::Column::NotifieeId.eq(notifiee_id))
            .filter(notification::Column::IsRead.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
