//! Comment endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
};
use curator_common::AppResult;
use curator_core::{CommentThread, TargetRef};
use curator_db::entities::{
    comment,
    interaction::{RelationKind, TargetKind},
    notification::NotificationType,
};
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ToggleResponse};

/// Comment response.
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub content: String,
    pub parent_comment_id: Option<String>,
    pub likes_count: i32,
    pub created_at: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            post_id: c.post_id,
            user_id: c.user_id,
            content: c.content,
            parent_comment_id: c.parent_comment_id,
            likes_count: c.likes_count,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// A top-level comment with its reply preview.
#[derive(Debug, Serialize)]
pub struct CommentThreadResponse {
    #[serde(flatten)]
    pub comment: CommentResponse,
    pub replies: Vec<CommentResponse>,
}

impl From<CommentThread> for CommentThreadResponse {
    fn from(t: CommentThread) -> Self {
        Self {
            comment: t.comment.into(),
            replies: t.replies.into_iter().map(Into::into).collect(),
        }
    }
}

/// Toggle a like on a comment.
async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ToggleResponse>> {
    let comment = state.comment_service.get(&id).await?;

    let target = TargetRef::new(TargetKind::Comment, &id);
    let outcome = state
        .interaction_service
        .toggle(&user.id, &target, RelationKind::CommentLike, None)
        .await?;

    if outcome.created
        && let Err(e) = state
            .notification_service
            .notify(
                &comment.user_id,
                &user.id,
                NotificationType::CommentLike,
                Some(&comment.post_id),
                Some(&id),
            )
            .await
    {
        tracing::warn!(error = %e, "Failed to create comment like notification");
    }

    Ok(Json(ToggleResponse::like(outcome.created, outcome.count)))
}

/// Delete a comment.
async fn delete_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.comment_service.delete(&user.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", delete(delete_comment))
        .route("/{id}/like", post(like))
}
