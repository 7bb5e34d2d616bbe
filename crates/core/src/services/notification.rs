//! Notification service.

use curator_common::{AppError, AppResult, IdGenerator};
use curator_db::{
    entities::notification::{self, NotificationType},
    repositories::NotificationRepository,
};
use sea_orm::Set;

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub fn new(notification_repo: NotificationRepository) -> Self {
        Self {
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Notify a user about an event. Self-notifications are skipped.
    pub async fn notify(
        &self,
        notifiee_id: &str,
        notifier_id: &str,
        notification_type: NotificationType,
        post_id: Option<&str>,
        comment_id: Option<&str>,
    ) -> AppResult<Option<notification::Model>> {
        if notifiee_id == notifier_id {
            return Ok(None);
        }

        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            notifiee_id: Set(notifiee_id.to_string()),
            notifier_id: Set(Some(notifier_id.to_string())),
            notification_type: Set(notification_type),
            post_id: Set(post_id.map(ToString::to_string)),
            comment_id: Set(comment_id.map(ToString::to_string)),
            ..Default::default()
        };

        let created = self.notification_repo.create(model).await?;
        Ok(Some(created))
    }

    /// List a user's notifications, newest first.
    pub async fn list(
        &self,
        notifiee_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_by_notifiee(notifiee_id, limit, until_id)
            .await
    }

    /// Mark a notification as read.
    pub async fn mark_read(&self, notifiee_id: &str, id: &str) -> AppResult<()> {
        self.notification_repo
            .find_for_notifiee(id, notifiee_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Notification not found: {id}")))?;

        self.notification_repo.mark_read(id, notifiee_id).await
    }

    /// Mark every unread notification as read.
    pub async fn mark_all_read(&self, notifiee_id: &str) -> AppResult<()> {
        self.notification_repo.mark_all_read(notifiee_id).await
    }

    /// Count unread notifications.
    pub async fn count_unread(&self, notifiee_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(notifiee_id).await
    }
}
