//! Following service.
//!
//! Follow relationships live in the interaction ledger like every other
//! edge, but the HTTP surface wants explicit create/delete semantics
//! instead of a toggle: following someone you already follow is an
//! error, not an unfollow.

use crate::services::interaction::{InteractionService, TargetRef};
use curator_common::{AppError, AppResult};
use curator_db::entities::{
    interaction::{RelationKind, TargetKind},
    user,
};

/// Following service for business logic.
#[derive(Clone)]
pub struct FollowingService {
    interaction: InteractionService,
}

impl FollowingService {
    /// Create a new following service.
    #[must_use]
    pub const fn new(interaction: InteractionService) -> Self {
        Self { interaction }
    }

    /// Follow a user. Returns the followee's follower count.
    ///
    /// The membership check gives the common duplicate a clean 400; the
    /// unique index behind `create_edge` catches the rest. A concurrent
    /// duplicate surfaces as `Conflict` and maps to the same 400, so a
    /// lost race never turns into an unfollow.
    pub async fn follow(&self, follower_id: &str, followee_id: &str) -> AppResult<i32> {
        let target = TargetRef::new(TargetKind::User, followee_id);

        if self
            .interaction
            .is_member(follower_id, &target, RelationKind::Follow)
            .await?
        {
            return Err(AppError::BadRequest(
                "Already following this user".to_string(),
            ));
        }

        match self
            .interaction
            .create_edge(follower_id, &target, RelationKind::Follow, None)
            .await
        {
            Err(AppError::Conflict(_)) => Err(AppError::BadRequest(
                "Already following this user".to_string(),
            )),
            other => other,
        }
    }

    /// Unfollow a user. Returns the followee's follower count.
    pub async fn unfollow(&self, follower_id: &str, followee_id: &str) -> AppResult<i32> {
        let target = TargetRef::new(TargetKind::User, followee_id);

        if !self
            .interaction
            .is_member(follower_id, &target, RelationKind::Follow)
            .await?
        {
            return Err(AppError::BadRequest(
                "Not following this user".to_string(),
            ));
        }

        // The edge can vanish between the check and the transaction
        match self
            .interaction
            .delete_edge(follower_id, &target, RelationKind::Follow)
            .await
        {
            Err(AppError::NotFound(_)) => Err(AppError::BadRequest(
                "Not following this user".to_string(),
            )),
            other => other,
        }
    }

    /// Check whether one user follows another.
    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> AppResult<bool> {
        let target = TargetRef::new(TargetKind::User, followee_id);
        self.interaction
            .is_member(follower_id, &target, RelationKind::Follow)
            .await
    }

    /// List a user's followers.
    pub async fn get_followers(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<user::Model>> {
        self.interaction.list_followers(user_id, limit, until_id).await
    }

    /// List users a user follows.
    pub async fn get_following(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<user::Model>> {
        self.interaction.list_following(user_id, limit, until_id).await
    }
}
