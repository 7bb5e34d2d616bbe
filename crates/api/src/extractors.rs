//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use curator_common::AppError;
use curator_db::entities::user;

/// Authenticated actor. Rejects with 401 when the auth middleware put
/// no user on the request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(Self)
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional actor for endpoints that personalize but do not require
/// auth, such as the `is_following` flag on profiles.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<user::Model>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}
