//! Lookbook endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use curator_common::AppResult;
use curator_core::{CreateLookbookInput, TargetRef};
use curator_db::entities::{
    interaction::{RelationKind, TargetKind},
    lookbook,
};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::PaginationQuery,
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, ToggleResponse},
};

/// Create lookbook request.
#[derive(Debug, Deserialize)]
pub struct CreateLookbookRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

const fn default_public() -> bool {
    true
}

/// Lookbook response.
#[derive(Debug, Serialize)]
pub struct LookbookResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub is_featured: bool,
    pub likes_count: i32,
    pub created_at: String,
}

impl From<lookbook::Model> for LookbookResponse {
    fn from(l: lookbook::Model) -> Self {
        Self {
            id: l.id,
            user_id: l.user_id,
            title: l.title,
            description: l.description,
            is_public: l.is_public,
            is_featured: l.is_featured,
            likes_count: l.likes_count,
            created_at: l.created_at.to_rfc3339(),
        }
    }
}

/// Create a lookbook.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateLookbookRequest>,
) -> AppResult<(StatusCode, ApiResponse<LookbookResponse>)> {
    let input = CreateLookbookInput {
        title: req.title,
        description: req.description,
        is_public: req.is_public,
    };

    let created = state.lookbook_service.create(&user.id, input).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(created.into())))
}

/// List lookbooks visible to the viewer, featured first.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<ApiResponse<Vec<LookbookResponse>>> {
    let lookbooks = state
        .lookbook_service
        .list(&user.id, query.limit(), query.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(
        lookbooks.into_iter().map(Into::into).collect(),
    ))
}

/// Get a lookbook.
async fn get_lookbook(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LookbookResponse>> {
    let lookbook = state.lookbook_service.get(&user.id, &id).await?;
    Ok(ApiResponse::ok(lookbook.into()))
}

/// Toggle a like on a lookbook.
async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ToggleResponse>> {
    let target = TargetRef::new(TargetKind::Lookbook, &id);
    let outcome = state
        .interaction_service
        .toggle(&user.id, &target, RelationKind::Like, None)
        .await?;

    Ok(Json(ToggleResponse::like(outcome.created, outcome.count)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_lookbook))
        .route("/{id}/like", post(like))
}
