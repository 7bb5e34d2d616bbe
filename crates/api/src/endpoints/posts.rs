//! Post endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use curator_common::{AppError, AppResult};
use curator_core::{CreatePostInput, FeedType, TargetRef};
use curator_db::entities::{
    interaction::{RelationKind, TargetKind},
    notification::NotificationType,
    post,
};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::{PaginationQuery, comments::CommentThreadResponse},
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{ApiResponse, ToggleResponse},
};

/// Create post request.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub caption: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub outfit_id: Option<String>,
    #[serde(default = "default_privacy")]
    pub privacy: String,
}

fn default_privacy() -> String {
    "public".to_string()
}

/// Post response.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub user_id: String,
    pub caption: String,
    pub tags: serde_json::Value,
    pub outfit_id: Option<String>,
    pub privacy: String,
    pub likes_count: i32,
    pub comments_count: i32,
    pub shares_count: i32,
    pub saves_count: i32,
    pub views_count: i32,
    pub created_at: String,
}

impl From<post::Model> for PostResponse {
    fn from(p: post::Model) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            caption: p.caption,
            tags: p.tags,
            outfit_id: p.outfit_id,
            privacy: match p.privacy {
                post::Privacy::Public => "public",
                post::Privacy::Friends => "friends",
                post::Privacy::Private => "private",
            }
            .to_string(),
            likes_count: p.likes_count,
            comments_count: p.comments_count,
            shares_count: p.shares_count,
            saves_count: p.saves_count,
            views_count: p.views_count,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

fn parse_privacy(s: &str) -> AppResult<post::Privacy> {
    match s {
        "public" => Ok(post::Privacy::Public),
        "friends" => Ok(post::Privacy::Friends),
        "private" => Ok(post::Privacy::Private),
        _ => Err(AppError::BadRequest(format!("Unknown privacy: {s}"))),
    }
}

/// Create a post.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> AppResult<(StatusCode, ApiResponse<PostResponse>)> {
    let input = CreatePostInput {
        caption: req.caption,
        tags: req.tags,
        outfit_id: req.outfit_id,
        privacy: parse_privacy(&req.privacy)?,
    };

    let created = state.post_service.create(&user.id, input).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(created.into())))
}

/// Feed query parameters.
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(rename = "type", default = "default_feed")]
    pub feed: String,
    #[serde(default = "super::default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
    #[serde(default)]
    pub offset: u64,
}

fn default_feed() -> String {
    "following".to_string()
}

/// Get the viewer's feed.
async fn feed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<ApiResponse<Vec<PostResponse>>> {
    let feed = FeedType::parse(&query.feed)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown feed type: {}", query.feed)))?;

    let posts = state
        .post_service
        .get_feed(
            &user.id,
            feed,
            query.limit.clamp(1, 100),
            query.until_id.as_deref(),
            query.offset,
        )
        .await?;

    Ok(ApiResponse::ok(posts.into_iter().map(Into::into).collect()))
}

/// Post detail: the post plus the viewer's relation to it.
#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub is_liked: bool,
    pub is_saved: bool,
}

/// Get a post (records a view).
async fn get_post(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PostDetailResponse>> {
    let post = state.post_service.view(&id).await?;

    let (is_liked, is_saved) = match &viewer {
        Some(viewer) => {
            let target = TargetRef::new(TargetKind::Post, &id);
            let liked = state
                .interaction_service
                .is_member(&viewer.id, &target, RelationKind::Like)
                .await?;
            let saved = state
                .interaction_service
                .is_member(&viewer.id, &target, RelationKind::Save)
                .await?;
            (liked, saved)
        }
        None => (false, false),
    };

    Ok(ApiResponse::ok(PostDetailResponse {
        post: post.into(),
        is_liked,
        is_saved,
    }))
}

/// Delete a post.
async fn delete_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.post_service.delete(&user.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle a like on a post.
async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ToggleResponse>> {
    let author = state.post_service.get(&id).await?.user_id;

    let target = TargetRef::new(TargetKind::Post, &id);
    let outcome = state
        .interaction_service
        .toggle(&user.id, &target, RelationKind::Like, None)
        .await?;

    if outcome.created
        && let Err(e) = state
            .notification_service
            .notify(&author, &user.id, NotificationType::Like, Some(&id), None)
            .await
    {
        tracing::warn!(error = %e, "Failed to create like notification");
    }

    Ok(Json(ToggleResponse::like(outcome.created, outcome.count)))
}

/// Save request body.
#[derive(Debug, Default, Deserialize)]
pub struct SaveRequest {
    pub collection_name: Option<String>,
}

/// Toggle a save on a post.
async fn save(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<SaveRequest>>,
) -> AppResult<Json<ToggleResponse>> {
    let author = state.post_service.get(&id).await?.user_id;
    let collection = body.and_then(|Json(b)| b.collection_name);

    let target = TargetRef::new(TargetKind::Post, &id);
    let outcome = state
        .interaction_service
        .toggle(&user.id, &target, RelationKind::Save, collection.as_deref())
        .await?;

    if outcome.created
        && let Err(e) = state
            .notification_service
            .notify(&author, &user.id, NotificationType::Save, Some(&id), None)
            .await
    {
        tracing::warn!(error = %e, "Failed to create save notification");
    }

    Ok(Json(ToggleResponse::save(outcome.created, outcome.count)))
}

/// Share response body.
#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub success: bool,
    pub message: String,
    pub share_url: String,
    pub shares_count: i32,
}

/// Record a share of a post.
async fn share(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ShareResponse>> {
    let (post, share_url) = state.post_service.share(&id).await?;

    Ok(Json(ShareResponse {
        success: true,
        message: "Shared".to_string(),
        share_url,
        shares_count: post.shares_count,
    }))
}

/// Comment listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListCommentsQuery {
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default = "super::default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

fn default_sort() -> String {
    "recent".to_string()
}

/// List comments on a post.
async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListCommentsQuery>,
) -> AppResult<ApiResponse<Vec<CommentThreadResponse>>> {
    let sort = match query.sort.as_str() {
        "recent" => curator_db::repositories::CommentSort::Recent,
        "popular" => curator_db::repositories::CommentSort::Popular,
        other => {
            return Err(AppError::BadRequest(format!("Unknown sort: {other}")));
        }
    };

    let threads = state
        .comment_service
        .list(&id, sort, query.limit.clamp(1, 100), query.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(
        threads.into_iter().map(Into::into).collect(),
    ))
}

/// Add comment request.
#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub content: String,
    pub parent_comment_id: Option<String>,
}

/// Add a comment to a post.
async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddCommentRequest>,
) -> AppResult<(StatusCode, ApiResponse<crate::endpoints::comments::CommentResponse>)> {
    let author = state.post_service.get(&id).await?.user_id;

    let created = state
        .comment_service
        .add(&user.id, &id, &req.content, req.parent_comment_id.as_deref())
        .await?;

    if let Err(e) = state
        .notification_service
        .notify(
            &author,
            &user.id,
            NotificationType::Comment,
            Some(&id),
            Some(&created.id),
        )
        .await
    {
        tracing::warn!(error = %e, "Failed to create comment notification");
    }

    Ok((StatusCode::CREATED, ApiResponse::ok(created.into())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/feed", get(feed))
        .route("/{id}", get(get_post).delete(delete_post))
        .route("/{id}/like", post(like))
        .route("/{id}/save", post(save))
        .route("/{id}/share", post(share))
        .route("/{id}/comments", get(list_comments).post(add_comment))
}
