//! Interaction repository — edge storage for the interaction ledger.
//!
//! Mutating methods come in `_in` variants generic over [`ConnectionTrait`]
//! so the ledger service can run an entire toggle (edge lookup, edge
//! insert/delete, counter update, counter read-back) inside one
//! transaction. Counter updates are single atomic `UPDATE` statements;
//! decrements are floored at zero in SQL.

use std::sync::Arc;

use crate::entities::{
    Comment, Interaction, Lookbook, Outfit, Post, User, comment,
    interaction::{self, RelationKind, TargetKind},
    lookbook, outfit, post, user,
};
use curator_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Interaction repository for database operations.
#[derive(Clone)]
pub struct InteractionRepository {
    db: Arc<DatabaseConnection>,
}

impl InteractionRepository {
    /// Create a new interaction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an edge by its (actor, target, kind) identity.
    pub async fn find_edge(
        &self,
        user_id: &str,
        target_kind: TargetKind,
        target_id: &str,
        kind: RelationKind,
    ) -> AppResult<Option<interaction::Model>> {
        self.find_edge_in(self.db.as_ref(), user_id, target_kind, target_id, kind)
            .await
    }

    /// Check whether an edge exists.
    pub async fn has_edge(
        &self,
        user_id: &str,
        target_kind: TargetKind,
        target_id: &str,
        kind: RelationKind,
    ) -> AppResult<bool> {
        Ok(self
            .find_edge(user_id, target_kind, target_id, kind)
            .await?
            .is_some())
    }

    /// Find an edge inside an existing transaction or connection.
    pub async fn find_edge_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        target_kind: TargetKind,
        target_id: &str,
        kind: RelationKind,
    ) -> AppResult<Option<interaction::Model>> {
        Interaction::find()
            .filter(interaction::Column::UserId.eq(user_id))
            .filter(interaction::Column::TargetKind.eq(target_kind))
            .filter(interaction::Column::TargetId.eq(target_id))
            .filter(interaction::Column::Kind.eq(kind))
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new edge.
    ///
    /// A unique-constraint violation (two concurrent first toggles racing
    /// on the same edge) is surfaced as [`AppError::Conflict`] so the
    /// caller can re-run the toggle once instead of failing hard.
    pub async fn insert_edge_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: interaction::ActiveModel,
    ) -> AppResult<interaction::Model> {
        model.insert(conn).await.map_err(|e| {
            if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
                AppError::Conflict("Interaction edge already exists".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Delete an edge.
    pub async fn delete_edge_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        edge: interaction::Model,
    ) -> AppResult<()> {
        edge.delete(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment the target's counter for the given relation atomically
    /// (single UPDATE query, no fetch).
    pub async fn increment_counter_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        target_kind: TargetKind,
        target_id: &str,
        kind: RelationKind,
    ) -> AppResult<()> {
        let result = match (target_kind, kind) {
            (TargetKind::Post, RelationKind::Like) => {
                Post::update_many()
                    .col_expr(
                        post::Column::LikesCount,
                        Expr::col(post::Column::LikesCount).add(1),
                    )
                    .filter(post::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::Post, RelationKind::Save) => {
                Post::update_many()
                    .col_expr(
                        post::Column::SavesCount,
                        Expr::col(post::Column::SavesCount).add(1),
                    )
                    .filter(post::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::Outfit, RelationKind::Like) => {
                Outfit::update_many()
                    .col_expr(
                        outfit::Column::LikesCount,
                        Expr::col(outfit::Column::LikesCount).add(1),
                    )
                    .filter(outfit::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::Outfit, RelationKind::Save) => {
                Outfit::update_many()
                    .col_expr(
                        outfit::Column::SavesCount,
                        Expr::col(outfit::Column::SavesCount).add(1),
                    )
                    .filter(outfit::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::Lookbook, RelationKind::Like) => {
                Lookbook::update_many()
                    .col_expr(
                        lookbook::Column::LikesCount,
                        Expr::col(lookbook::Column::LikesCount).add(1),
                    )
                    .filter(lookbook::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::Comment, RelationKind::CommentLike) => {
                Comment::update_many()
                    .col_expr(
                        comment::Column::LikesCount,
                        Expr::col(comment::Column::LikesCount).add(1),
                    )
                    .filter(comment::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::User, RelationKind::Follow) => {
                User::update_many()
                    .col_expr(
                        user::Column::FollowersCount,
                        Expr::col(user::Column::FollowersCount).add(1),
                    )
                    .filter(user::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            _ => {
                return Err(AppError::BadRequest(
                    "Unsupported target/relation combination".to_string(),
                ));
            }
        };

        result.map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement the target's counter for the given relation atomically,
    /// floored at zero in SQL.
    pub async fn decrement_counter_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        target_kind: TargetKind,
        target_id: &str,
        kind: RelationKind,
    ) -> AppResult<()> {
        let result = match (target_kind, kind) {
            (TargetKind::Post, RelationKind::Like) => {
                Post::update_many()
                    .col_expr(
                        post::Column::LikesCount,
                        Expr::cust("GREATEST(likes_count - 1, 0)"),
                    )
                    .filter(post::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::Post, RelationKind::Save) => {
                Post::update_many()
                    .col_expr(
                        post::Column::SavesCount,
                        Expr::cust("GREATEST(saves_count - 1, 0)"),
                    )
                    .filter(post::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::Outfit, RelationKind::Like) => {
                Outfit::update_many()
                    .col_expr(
                        outfit::Column::LikesCount,
                        Expr::cust("GREATEST(likes_count - 1, 0)"),
                    )
                    .filter(outfit::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::Outfit, RelationKind::Save) => {
                Outfit::update_many()
                    .col_expr(
                        outfit::Column::SavesCount,
                        Expr::cust("GREATEST(saves_count - 1, 0)"),
                    )
                    .filter(outfit::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::Lookbook, RelationKind::Like) => {
                Lookbook::update_many()
                    .col_expr(
                        lookbook::Column::LikesCount,
                        Expr::cust("GREATEST(likes_count - 1, 0)"),
                    )
                    .filter(lookbook::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::Comment, RelationKind::CommentLike) => {
                Comment::update_many()
                    .col_expr(
                        comment::Column::LikesCount,
                        Expr::cust("GREATEST(likes_count - 1, 0)"),
                    )
                    .filter(comment::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::User, RelationKind::Follow) => {
                User::update_many()
                    .col_expr(
                        user::Column::FollowersCount,
                        Expr::cust("GREATEST(followers_count - 1, 0)"),
                    )
                    .filter(user::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            _ => {
                return Err(AppError::BadRequest(
                    "Unsupported target/relation combination".to_string(),
                ));
            }
        };

        result.map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment the follower-side `following_count` (Follow edges touch
    /// counters on both users).
    pub async fn increment_following_count_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> AppResult<()> {
        User::update_many()
            .col_expr(
                user::Column::FollowingCount,
                Expr::col(user::Column::FollowingCount).add(1),
            )
            .filter(user::Column::Id.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement the follower-side `following_count`, floored at zero.
    pub async fn decrement_following_count_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> AppResult<()> {
        User::update_many()
            .col_expr(
                user::Column::FollowingCount,
                Expr::cust("GREATEST(following_count - 1, 0)"),
            )
            .filter(user::Column::Id.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Read the stored counter for (target, relation).
    ///
    /// This is the cached field on the target row, not a live recount.
    pub async fn read_counter_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        target_kind: TargetKind,
        target_id: &str,
        kind: RelationKind,
    ) -> AppResult<i32> {
        let value = match (target_kind, kind) {
            (TargetKind::Post, RelationKind::Like) => Post::find_by_id(target_id)
                .one(conn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .map(|m| m.likes_count),
            (TargetKind::Post, RelationKind::Save) => Post::find_by_id(target_id)
                .one(conn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .map(|m| m.saves_count),
            (TargetKind::Outfit, RelationKind::Like) => Outfit::find_by_id(target_id)
                .one(conn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .map(|m| m.likes_count),
            (TargetKind::Outfit, RelationKind::Save) => Outfit::find_by_id(target_id)
                .one(conn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .map(|m| m.saves_count),
            (TargetKind::Lookbook, RelationKind::Like) => Lookbook::find_by_id(target_id)
                .one(conn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .map(|m| m.likes_count),
            (TargetKind::Comment, RelationKind::CommentLike) => Comment::find_by_id(target_id)
                .one(conn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .map(|m| m.likes_count),
            (TargetKind::User, RelationKind::Follow) => User::find_by_id(target_id)
                .one(conn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .map(|m| m.followers_count),
            _ => {
                return Err(AppError::BadRequest(
                    "Unsupported target/relation combination".to_string(),
                ));
            }
        };

        value.ok_or_else(|| AppError::NotFound(format!("Target not found: {target_id}")))
    }

    /// Overwrite the stored counter with a recomputed value (drift repair).
    pub async fn overwrite_counter_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        target_kind: TargetKind,
        target_id: &str,
        kind: RelationKind,
        value: i32,
    ) -> AppResult<()> {
        let result = match (target_kind, kind) {
            (TargetKind::Post, RelationKind::Like) => {
                Post::update_many()
                    .col_expr(post::Column::LikesCount, Expr::value(value))
                    .filter(post::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::Post, RelationKind::Save) => {
                Post::update_many()
                    .col_expr(post::Column::SavesCount, Expr::value(value))
                    .filter(post::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::Outfit, RelationKind::Like) => {
                Outfit::update_many()
                    .col_expr(outfit::Column::LikesCount, Expr::value(value))
                    .filter(outfit::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::Outfit, RelationKind::Save) => {
                Outfit::update_many()
                    .col_expr(outfit::Column::SavesCount, Expr::value(value))
                    .filter(outfit::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::Lookbook, RelationKind::Like) => {
                Lookbook::update_many()
                    .col_expr(lookbook::Column::LikesCount, Expr::value(value))
                    .filter(lookbook::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::Comment, RelationKind::CommentLike) => {
                Comment::update_many()
                    .col_expr(comment::Column::LikesCount, Expr::value(value))
                    .filter(comment::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            (TargetKind::User, RelationKind::Follow) => {
                User::update_many()
                    .col_expr(user::Column::FollowersCount, Expr::value(value))
                    .filter(user::Column::Id.eq(target_id))
                    .exec(conn)
                    .await
            }
            _ => {
                return Err(AppError::BadRequest(
                    "Unsupported target/relation combination".to_string(),
                ));
            }
        };

        result.map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count live edges for (target, relation).
    pub async fn count_edges_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        target_kind: TargetKind,
        target_id: &str,
        kind: RelationKind,
    ) -> AppResult<u64> {
        Interaction::find()
            .filter(interaction::Column::TargetKind.eq(target_kind))
            .filter(interaction::Column::TargetId.eq(target_id))
            .filter(interaction::Column::Kind.eq(kind))
            .count(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count live edges for (target, relation) on the main connection.
    pub async fn count_edges(
        &self,
        target_kind: TargetKind,
        target_id: &str,
        kind: RelationKind,
    ) -> AppResult<u64> {
        self.count_edges_in(self.db.as_ref(), target_kind, target_id, kind)
            .await
    }

    /// Get Follow edges pointing at a user, newest first (paginated).
    pub async fn find_followers(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<interaction::Model>> {
        let mut query = Interaction::find()
            .filter(interaction::Column::TargetKind.eq(TargetKind::User))
            .filter(interaction::Column::TargetId.eq(user_id))
            .filter(interaction::Column::Kind.eq(RelationKind::Follow))
            .order_by_desc(interaction::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(interaction::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get Follow edges created by a user, newest first (paginated).
    pub async fn find_following(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<interaction::Model>> {
        let mut query = Interaction::find()
            .filter(interaction::Column::UserId.eq(user_id))
            .filter(interaction::Column::TargetKind.eq(TargetKind::User))
            .filter(interaction::Column::Kind.eq(RelationKind::Follow))
            .order_by_desc(interaction::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(interaction::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get ids of every user a user follows (feed source list).
    pub async fn find_following_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        let edges = Interaction::find()
            .filter(interaction::Column::UserId.eq(user_id))
            .filter(interaction::Column::TargetKind.eq(TargetKind::User))
            .filter(interaction::Column::Kind.eq(RelationKind::Follow))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(edges.into_iter().map(|e| e.target_id).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_edge(
        id: &str,
        user_id: &str,
        target_kind: TargetKind,
        target_id: &str,
        kind: RelationKind,
    ) -> interaction::Model {
        interaction::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            target_kind,
            target_id: target_id.to_string(),
            kind,
            collection_name: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_edge_found() {
        let edge = create_test_edge("e1", "user1", TargetKind::Post, "post1", RelationKind::Like);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge.clone()]])
                .into_connection(),
        );

        let repo = InteractionRepository::new(db);
        let result = repo
            .find_edge("user1", TargetKind::Post, "post1", RelationKind::Like)
            .await
            .unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.id, "e1");
        assert_eq!(found.kind, RelationKind::Like);
    }

    #[tokio::test]
    async fn test_find_edge_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<interaction::Model>::new()])
                .into_connection(),
        );

        let repo = InteractionRepository::new(db);
        let result = repo
            .find_edge("user1", TargetKind::Post, "missing", RelationKind::Like)
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_has_edge_true() {
        let edge = create_test_edge("e1", "user1", TargetKind::Outfit, "o1", RelationKind::Save);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .into_connection(),
        );

        let repo = InteractionRepository::new(db);
        let result = repo
            .has_edge("user1", TargetKind::Outfit, "o1", RelationKind::Save)
            .await
            .unwrap();

        assert!(result);
    }

    #[tokio::test]
    async fn test_has_edge_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<interaction::Model>::new()])
                .into_connection(),
        );

        let repo = InteractionRepository::new(db);
        let result = repo
            .has_edge("user1", TargetKind::Outfit, "o1", RelationKind::Save)
            .await
            .unwrap();

        assert!(!result);
    }

    #[tokio::test]
    async fn test_find_followers() {
        let e1 = create_test_edge("e1", "user2", TargetKind::User, "user1", RelationKind::Follow);
        let e2 = create_test_edge("e2", "user3", TargetKind::User, "user1", RelationKind::Follow);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[e1, e2]])
                .into_connection(),
        );

        let repo = InteractionRepository::new(db);
        let result = repo.find_followers("user1", 10, None).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].user_id, "user2");
    }

    #[tokio::test]
    async fn test_find_following_ids() {
        let e1 = create_test_edge("e1", "user1", TargetKind::User, "user2", RelationKind::Follow);
        let e2 = create_test_edge("e2", "user1", TargetKind::User, "user3", RelationKind::Follow);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[e1, e2]])
                .into_connection(),
        );

        let repo = InteractionRepository::new(db);
        let result = repo.find_following_ids("user1").await.unwrap();

        assert_eq!(result, vec!["user2".to_string(), "user3".to_string()]);
    }

    #[tokio::test]
    async fn test_increment_counter_rejects_invalid_pair() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = InteractionRepository::new(db.clone());
        let result = repo
            .increment_counter_in(db.as_ref(), TargetKind::Lookbook, "l1", RelationKind::Save)
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_read_counter_target_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<crate::entities::post::Model>::new()])
                .into_connection(),
        );

        let repo = InteractionRepository::new(db.clone());
        let result = repo
            .read_counter_in(db.as_ref(), TargetKind::Post, "missing", RelationKind::Like)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
