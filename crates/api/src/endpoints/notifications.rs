//! Notification endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use curator_common::AppResult;
use curator_db::entities::notification::{self, NotificationType};
use serde::Serialize;

use crate::{
    endpoints::PaginationQuery, extractors::AuthUser, middleware::AppState, response::ApiResponse,
};

/// Notification response.
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub notifier_id: Option<String>,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub post_id: Option<String>,
    pub comment_id: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

impl From<notification::Model> for NotificationResponse {
    fn from(n: notification::Model) -> Self {
        Self {
            id: n.id,
            notifier_id: n.notifier_id,
            notification_type: match n.notification_type {
                NotificationType::Follow => "follow",
                NotificationType::Like => "like",
                NotificationType::Save => "save",
                NotificationType::Comment => "comment",
                NotificationType::CommentLike => "commentLike",
            }
            .to_string(),
            post_id: n.post_id,
            comment_id: n.comment_id,
            is_read: n.is_read,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// Notification listing body, with the unread count alongside the page.
#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationResponse>,
    pub unread_count: u64,
}

/// List the viewer's notifications.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<ApiResponse<NotificationListResponse>> {
    let notifications = state
        .notification_service
        .list(&user.id, query.limit(), query.until_id.as_deref())
        .await?;
    let unread_count = state.notification_service.count_unread(&user.id).await?;

    Ok(ApiResponse::ok(NotificationListResponse {
        notifications: notifications.into_iter().map(Into::into).collect(),
        unread_count,
    }))
}

/// Mark one notification as read.
async fn mark_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    state.notification_service.mark_read(&user.id, &id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Mark every notification as read.
async fn mark_all_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    state.notification_service.mark_all_read(&user.id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/read-all", post(mark_all_read))
        .route("/{id}/read", post(mark_read))
}
