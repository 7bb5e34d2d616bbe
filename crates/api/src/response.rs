//! API response types.
//!
//! Success bodies only; error bodies are produced by the error type's
//! own `IntoResponse` impl.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard `{data}` envelope for reads.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a payload.
    pub const fn ok(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Flat toggle response body. Mutation endpoints (like, save, follow)
/// speak this shape instead of the [`ApiResponse`] wrapper because
/// existing clients read these fields at the top level.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_saved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saves_count: Option<i32>,
}

impl ToggleResponse {
    /// Build a like-toggle body.
    #[must_use]
    pub fn like(created: bool, count: i32) -> Self {
        Self {
            success: true,
            message: if created { "Liked" } else { "Unliked" }.to_string(),
            is_liked: Some(created),
            is_saved: None,
            likes_count: Some(count),
            saves_count: None,
        }
    }

    /// Build a save-toggle body.
    #[must_use]
    pub fn save(created: bool, count: i32) -> Self {
        Self {
            success: true,
            message: if created { "Saved" } else { "Unsaved" }.to_string(),
            is_liked: None,
            is_saved: Some(created),
            likes_count: None,
            saves_count: Some(count),
        }
    }
}
