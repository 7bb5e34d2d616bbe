//! User endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use curator_common::{AppError, AppResult};
use curator_db::entities::{notification::NotificationType, user};
use serde::Serialize;

use crate::{
    endpoints::PaginationQuery,
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Public user representation.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub followers_count: i32,
    pub following_count: i32,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            name: u.name,
            bio: u.bio,
            avatar_url: u.avatar_url,
            followers_count: u.followers_count,
            following_count: u.following_count,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Profile response: a user plus the viewer's relation to them.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub is_following: bool,
}

/// Follow mutation response body.
#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub success: bool,
    pub message: String,
    pub is_following: bool,
    pub followers_count: i32,
}

/// Get a user's profile by id or username.
async fn profile(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let user = match state.user_service.get(&id).await {
        Ok(user) => user,
        Err(AppError::UserNotFound(_)) => state.user_service.get_by_username(&id).await?,
        Err(e) => return Err(e),
    };

    let is_following = match &viewer {
        Some(viewer) if viewer.id != user.id => {
            state.following_service.is_following(&viewer.id, &user.id).await?
        }
        _ => false,
    };

    Ok(ApiResponse::ok(ProfileResponse {
        user: user.into(),
        is_following,
    }))
}

/// Follow a user.
async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<FollowResponse>)> {
    let followers_count = state.following_service.follow(&user.id, &id).await?;

    if let Err(e) = state
        .notification_service
        .notify(&id, &user.id, NotificationType::Follow, None, None)
        .await
    {
        tracing::warn!(error = %e, "Failed to create follow notification");
    }

    Ok((
        StatusCode::CREATED,
        Json(FollowResponse {
            success: true,
            message: "Followed".to_string(),
            is_following: true,
            followers_count,
        }),
    ))
}

/// Unfollow a user.
async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FollowResponse>> {
    let followers_count = state.following_service.unfollow(&user.id, &id).await?;

    Ok(Json(FollowResponse {
        success: true,
        message: "Unfollowed".to_string(),
        is_following: false,
        followers_count,
    }))
}

/// List a user's followers.
async fn followers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    // 404 before listing
    state.user_service.get(&id).await?;

    let users = state
        .following_service
        .get_followers(&id, query.limit(), query.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// List users a user follows.
async fn following(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    state.user_service.get(&id).await?;

    let users = state
        .following_service
        .get_following(&id, query.limit(), query.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(profile))
        .route("/{id}/follow", post(follow).delete(unfollow))
        .route("/{id}/followers", get(followers))
        .route("/{id}/following", get(following))
}
