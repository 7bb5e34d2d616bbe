//! Registration endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use curator_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{middleware::AppState, response::ApiResponse};

/// Register request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub name: Option<String>,
}

/// Registration response carrying the issued token.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Register a new user.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, ApiResponse<RegisterResponse>)> {
    let user = state
        .user_service
        .register(&req.username, req.name.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(RegisterResponse {
            id: user.id,
            username: user.username,
            token: user.token.unwrap_or_default(),
        }),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/register", post(register))
}
