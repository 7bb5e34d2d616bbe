//! API endpoints.

mod admin;
mod auth;
mod comments;
mod lookbooks;
mod notifications;
mod outfits;
mod posts;
mod users;

use axum::Router;
use serde::Deserialize;

use crate::middleware::AppState;

/// Common keyset pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

const fn default_limit() -> u64 {
    20
}

impl PaginationQuery {
    /// Effective page size, capped.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, 100)
    }
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/posts", posts::router())
        .nest("/comments", comments::router())
        .nest("/outfits", outfits::router())
        .nest("/lookbooks", lookbooks::router())
        .nest("/users", users::router())
        .nest("/notifications", notifications::router())
        .nest("/admin", admin::router())
}
