//! Outfit endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use curator_common::AppResult;
use curator_core::{CreateOutfitInput, TargetRef};
use curator_db::entities::{
    interaction::{RelationKind, TargetKind},
    outfit,
};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::PaginationQuery,
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, ToggleResponse},
};

/// Create outfit request.
#[derive(Debug, Deserialize)]
pub struct CreateOutfitRequest {
    pub name: String,
    pub description: Option<String>,
    pub occasion: Option<String>,
    pub season: Option<String>,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

const fn default_public() -> bool {
    true
}

/// Outfit response.
#[derive(Debug, Serialize)]
pub struct OutfitResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub occasion: Option<String>,
    pub season: Option<String>,
    pub is_public: bool,
    pub likes_count: i32,
    pub saves_count: i32,
    pub created_at: String,
}

impl From<outfit::Model> for OutfitResponse {
    fn from(o: outfit::Model) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            name: o.name,
            description: o.description,
            occasion: o.occasion,
            season: o.season,
            is_public: o.is_public,
            likes_count: o.likes_count,
            saves_count: o.saves_count,
            created_at: o.created_at.to_rfc3339(),
        }
    }
}

/// Create an outfit.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateOutfitRequest>,
) -> AppResult<(StatusCode, ApiResponse<OutfitResponse>)> {
    let input = CreateOutfitInput {
        name: req.name,
        description: req.description,
        occasion: req.occasion,
        season: req.season,
        is_public: req.is_public,
    };

    let created = state.outfit_service.create(&user.id, input).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(created.into())))
}

/// List outfits visible to the viewer.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<ApiResponse<Vec<OutfitResponse>>> {
    let outfits = state
        .outfit_service
        .list(&user.id, query.limit(), query.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(
        outfits.into_iter().map(Into::into).collect(),
    ))
}

/// Get an outfit.
async fn get_outfit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OutfitResponse>> {
    let outfit = state.outfit_service.get(&user.id, &id).await?;
    Ok(ApiResponse::ok(outfit.into()))
}

/// Toggle a like on an outfit.
async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ToggleResponse>> {
    let target = TargetRef::new(TargetKind::Outfit, &id);
    let outcome = state
        .interaction_service
        .toggle(&user.id, &target, RelationKind::Like, None)
        .await?;

    Ok(Json(ToggleResponse::like(outcome.created, outcome.count)))
}

/// Toggle a save on an outfit.
async fn save(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ToggleResponse>> {
    let target = TargetRef::new(TargetKind::Outfit, &id);
    let outcome = state
        .interaction_service
        .toggle(&user.id, &target, RelationKind::Save, None)
        .await?;

    Ok(Json(ToggleResponse::save(outcome.created, outcome.count)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_outfit))
        .route("/{id}/like", post(like))
        .route("/{id}/save", post(save))
}
