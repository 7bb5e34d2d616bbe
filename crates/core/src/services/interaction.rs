//! Interaction ledger service.
//!
//! Single entry point for every like, save, follow and comment-like
//! edge. Each toggle runs in one transaction that mutates the edge row
//! and the denormalized counter together, so the counter never drifts
//! more than what [`InteractionService::reconcile`] can repair.

use std::sync::Arc;

use curator_common::{AppError, AppResult, IdGenerator};
use curator_db::{
    entities::{
        interaction::{self, RelationKind, TargetKind},
        user,
    },
    repositories::{
        CommentRepository, InteractionRepository, LookbookRepository, OutfitRepository,
        PostRepository, UserRepository,
    },
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};

/// A reference to something an edge can point at.
#[derive(Debug, Clone)]
pub struct TargetRef {
    /// The kind of target.
    pub kind: TargetKind,
    /// The target's id.
    pub id: String,
}

impl TargetRef {
    /// Create a target reference.
    #[must_use]
    pub fn new(kind: TargetKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// The result of a toggle: whether the edge now exists, and the
/// counter value read back inside the same transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// True if the toggle created the edge, false if it removed it.
    pub created: bool,
    /// The target's counter after the toggle.
    pub count: i32,
}

/// Interaction ledger service for business logic.
#[derive(Clone)]
pub struct InteractionService {
    db: Arc<DatabaseConnection>,
    interaction_repo: InteractionRepository,
    user_repo: UserRepository,
    post_repo: PostRepository,
    outfit_repo: OutfitRepository,
    lookbook_repo: LookbookRepository,
    comment_repo: CommentRepository,
    id_gen: IdGenerator,
}

impl InteractionService {
    /// Create a new interaction service.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        interaction_repo: InteractionRepository,
        user_repo: UserRepository,
        post_repo: PostRepository,
        outfit_repo: OutfitRepository,
        lookbook_repo: LookbookRepository,
        comment_repo: CommentRepository,
    ) -> Self {
        Self {
            db,
            interaction_repo,
            user_repo,
            post_repo,
            outfit_repo,
            lookbook_repo,
            comment_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle an edge: create it if absent, remove it if present.
    ///
    /// Runs the edge mutation and counter update in one transaction. If
    /// a concurrent first toggle wins the unique-index race, the whole
    /// toggle is retried once; the retry then observes the edge and
    /// removes it, which is the correct toggle semantic for the loser.
    pub async fn toggle(
        &self,
        user_id: &str,
        target: &TargetRef,
        kind: RelationKind,
        collection_name: Option<&str>,
    ) -> AppResult<ToggleOutcome> {
        Self::validate_pair(target.kind, kind)?;
        self.ensure_target(user_id, target, kind).await?;

        match self
            .toggle_once(user_id, target, kind, collection_name)
            .await
        {
            Err(AppError::Conflict(_)) => {
                tracing::debug!(
                    user_id = %user_id,
                    target_id = %target.id,
                    "Edge insert raced a concurrent toggle, retrying"
                );
                self.toggle_once(user_id, target, kind, collection_name)
                    .await
            }
            other => other,
        }
    }

    async fn toggle_once(
        &self,
        user_id: &str,
        target: &TargetRef,
        kind: RelationKind,
        collection_name: Option<&str>,
    ) -> AppResult<ToggleOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let existing = self
            .interaction_repo
            .find_edge_in(&txn, user_id, target.kind, &target.id, kind)
            .await?;

        let created = if let Some(edge) = existing {
            self.interaction_repo.delete_edge_in(&txn, edge).await?;
            self.interaction_repo
                .decrement_counter_in(&txn, target.kind, &target.id, kind)
                .await?;
            if kind == RelationKind::Follow {
                self.interaction_repo
                    .decrement_following_count_in(&txn, user_id)
                    .await?;
            }
            false
        } else {
            let model = interaction::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(user_id.to_string()),
                target_kind: Set(target.kind),
                target_id: Set(target.id.clone()),
                kind: Set(kind),
                collection_name: Set(collection_name.map(ToString::to_string)),
                ..Default::default()
            };

            match self.interaction_repo.insert_edge_in(&txn, model).await {
                Ok(_) => {}
                Err(e) => {
                    txn.rollback()
                        .await
                        .map_err(|e| AppError::Database(e.to_string()))?;
                    return Err(e);
                }
            }

            self.interaction_repo
                .increment_counter_in(&txn, target.kind, &target.id, kind)
                .await?;
            if kind == RelationKind::Follow {
                self.interaction_repo
                    .increment_following_count_in(&txn, user_id)
                    .await?;
            }
            true
        };

        let count = self
            .interaction_repo
            .read_counter_in(&txn, target.kind, &target.id, kind)
            .await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(ToggleOutcome { created, count })
    }

    /// Create an edge that must not already exist.
    ///
    /// Unlike [`InteractionService::toggle`], losing the unique-index
    /// race surfaces as [`AppError::Conflict`] instead of falling back
    /// to the delete branch. Follow needs this: a duplicate follow is
    /// an error, never an implicit unfollow. Returns the counter read
    /// back inside the transaction.
    pub async fn create_edge(
        &self,
        user_id: &str,
        target: &TargetRef,
        kind: RelationKind,
        collection_name: Option<&str>,
    ) -> AppResult<i32> {
        Self::validate_pair(target.kind, kind)?;
        self.ensure_target(user_id, target, kind).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let model = interaction::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            target_kind: Set(target.kind),
            target_id: Set(target.id.clone()),
            kind: Set(kind),
            collection_name: Set(collection_name.map(ToString::to_string)),
            ..Default::default()
        };

        if let Err(e) = self.interaction_repo.insert_edge_in(&txn, model).await {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(e);
        }

        self.interaction_repo
            .increment_counter_in(&txn, target.kind, &target.id, kind)
            .await?;
        if kind == RelationKind::Follow {
            self.interaction_repo
                .increment_following_count_in(&txn, user_id)
                .await?;
        }

        let count = self
            .interaction_repo
            .read_counter_in(&txn, target.kind, &target.id, kind)
            .await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    /// Remove an edge that must exist.
    ///
    /// Fails with [`AppError::NotFound`] when there is no edge, so a
    /// concurrent removal cannot decrement the counter twice or, worse,
    /// recreate the edge the way a second toggle would. Returns the
    /// counter read back inside the transaction.
    pub async fn delete_edge(
        &self,
        user_id: &str,
        target: &TargetRef,
        kind: RelationKind,
    ) -> AppResult<i32> {
        Self::validate_pair(target.kind, kind)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let Some(edge) = self
            .interaction_repo
            .find_edge_in(&txn, user_id, target.kind, &target.id, kind)
            .await?
        else {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::NotFound("Interaction edge not found".to_string()));
        };

        self.interaction_repo.delete_edge_in(&txn, edge).await?;
        self.interaction_repo
            .decrement_counter_in(&txn, target.kind, &target.id, kind)
            .await?;
        if kind == RelationKind::Follow {
            self.interaction_repo
                .decrement_following_count_in(&txn, user_id)
                .await?;
        }

        let count = self
            .interaction_repo
            .read_counter_in(&txn, target.kind, &target.id, kind)
            .await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    /// Check whether an edge exists.
    pub async fn is_member(
        &self,
        user_id: &str,
        target: &TargetRef,
        kind: RelationKind,
    ) -> AppResult<bool> {
        Self::validate_pair(target.kind, kind)?;
        self.interaction_repo
            .has_edge(user_id, target.kind, &target.id, kind)
            .await
    }

    /// Read the stored counter for (target, relation).
    pub async fn count_for(&self, target: &TargetRef, kind: RelationKind) -> AppResult<i32> {
        Self::validate_pair(target.kind, kind)?;
        self.interaction_repo
            .read_counter_in(self.db.as_ref(), target.kind, &target.id, kind)
            .await
    }

    /// Recompute a counter from live edges and overwrite the stored value.
    ///
    /// Returns (stored value before, recounted value).
    pub async fn reconcile(&self, target: &TargetRef, kind: RelationKind) -> AppResult<(i32, i32)> {
        Self::validate_pair(target.kind, kind)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let stored = self
            .interaction_repo
            .read_counter_in(&txn, target.kind, &target.id, kind)
            .await?;
        let actual = self
            .interaction_repo
            .count_edges_in(&txn, target.kind, &target.id, kind)
            .await?;
        let actual = i32::try_from(actual).unwrap_or(i32::MAX);

        if stored != actual {
            tracing::warn!(
                target_id = %target.id,
                stored = stored,
                actual = actual,
                "Counter drift detected, overwriting"
            );
            self.interaction_repo
                .overwrite_counter_in(&txn, target.kind, &target.id, kind, actual)
                .await?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((stored, actual))
    }

    /// Users following the given user, newest follow first.
    pub async fn list_followers(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<user::Model>> {
        let edges = self
            .interaction_repo
            .find_followers(user_id, limit, until_id)
            .await?;
        let ids: Vec<String> = edges.iter().map(|e| e.user_id.clone()).collect();
        self.hydrate_in_order(&ids).await
    }

    /// Users the given user follows, newest follow first.
    pub async fn list_following(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<user::Model>> {
        let edges = self
            .interaction_repo
            .find_following(user_id, limit, until_id)
            .await?;
        let ids: Vec<String> = edges.iter().map(|e| e.target_id.clone()).collect();
        self.hydrate_in_order(&ids).await
    }

    /// Fetch users by id, preserving the order of `ids`.
    async fn hydrate_in_order(&self, ids: &[String]) -> AppResult<Vec<user::Model>> {
        let users = self.user_repo.find_by_ids(ids).await?;
        let mut by_id: std::collections::HashMap<String, user::Model> =
            users.into_iter().map(|u| (u.id.clone(), u)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Reject (target kind, relation kind) pairs the ledger does not track.
    fn validate_pair(target_kind: TargetKind, kind: RelationKind) -> AppResult<()> {
        let valid = matches!(
            (target_kind, kind),
            (TargetKind::Post | TargetKind::Outfit, RelationKind::Like | RelationKind::Save)
                | (TargetKind::Lookbook, RelationKind::Like)
                | (TargetKind::Comment, RelationKind::CommentLike)
                | (TargetKind::User, RelationKind::Follow)
        );

        if valid {
            Ok(())
        } else {
            Err(AppError::BadRequest(
                "Unsupported target/relation combination".to_string(),
            ))
        }
    }

    /// Verify the target exists and the actor may hold this relation to it.
    ///
    /// Liking or saving your own content is allowed. Following yourself
    /// is not.
    async fn ensure_target(
        &self,
        user_id: &str,
        target: &TargetRef,
        kind: RelationKind,
    ) -> AppResult<()> {
        match target.kind {
            TargetKind::Post => {
                self.post_repo.get_by_id(&target.id).await?;
            }
            TargetKind::Outfit => {
                self.outfit_repo.get_by_id(&target.id).await?;
            }
            TargetKind::Lookbook => {
                self.lookbook_repo.get_by_id(&target.id).await?;
            }
            TargetKind::Comment => {
                self.comment_repo.get_by_id(&target.id).await?;
            }
            TargetKind::User => {
                if kind == RelationKind::Follow && user_id == target.id {
                    return Err(AppError::BadRequest(
                        "Cannot follow yourself".to_string(),
                    ));
                }
                self.user_repo.get_by_id(&target.id).await?;
            }
        }
        Ok(())
    }
}
