//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, post};
use curator_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a live (non-deleted) post by id.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .filter(post::Column::IsDeleted.eq(false))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a live post by id, failing if it does not exist.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Soft-delete a post. The row stays so existing edges keep a target
    /// for reconciliation.
    pub async fn soft_delete(&self, post: post::Model) -> AppResult<()> {
        let mut active: post::ActiveModel = post.into();
        active.is_deleted = Set(true);
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Posts authored by the given users, newest first (following feed).
    pub async fn find_by_users(
        &self,
        user_ids: &[String],
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<post::Model>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = Post::find()
            .filter(post::Column::UserId.is_in(user_ids.iter().map(String::as_str)))
            .filter(post::Column::IsDeleted.eq(false))
            .order_by_desc(post::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(post::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Public posts not authored by the viewer, newest first (discover feed).
    pub async fn find_public_excluding(
        &self,
        exclude_user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<post::Model>> {
        let mut query = Post::find()
            .filter(post::Column::UserId.ne(exclude_user_id))
            .filter(post::Column::Privacy.eq(post::Privacy::Public))
            .filter(post::Column::IsDeleted.eq(false))
            .order_by_desc(post::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(post::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Public posts ranked by engagement (trending feed). Keyset
    /// pagination does not compose with the engagement ordering, so this
    /// feed uses a plain offset.
    pub async fn find_trending(&self, limit: u64, offset: u64) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::Privacy.eq(post::Privacy::Public))
            .filter(post::Column::IsDeleted.eq(false))
            .order_by_desc(post::Column::LikesCount)
            .order_by_desc(post::Column::CommentsCount)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment the view counter atomically.
    pub async fn increment_views_count(&self, id: &str) -> AppResult<()> {
        Post::update_many()
            .col_expr(
                post::Column::ViewsCount,
                Expr::col(post::Column::ViewsCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment the share counter atomically.
    pub async fn increment_shares_count(&self, id: &str) -> AppResult<()> {
        Post::update_many()
            .col_expr(
                post::Column::SharesCount,
                Expr::col(post::Column::SharesCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment the comment counter atomically.
    pub async fn increment_comments_count<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<()> {
        Post::update_many()
            .col_expr(
                post::Column::CommentsCount,
                Expr::col(post::Column::CommentsCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement the comment counter atomically, floored at zero.
    pub async fn decrement_comments_count<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<()> {
        Post::update_many()
            .col_expr(
                post::Column::CommentsCount,
                Expr::cust("GREATEST(comments_count - 1, 0)"),
            )
            .filter(post::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_post(id: &str, user_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            caption: "test caption".to_string(),
            tags: serde_json::json!([]),
            outfit_id: None,
            privacy: post::Privacy::Public,
            likes_count: 0,
            comments_count: 0,
            shares_count: 0,
            saves_count: 0,
            views_count: 0,
            is_deleted: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let post = create_test_post("post1", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.get_by_id("post1").await.unwrap();

        assert_eq!(result.user_id, "user1");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_users_empty_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = PostRepository::new(db);
        let result = repo.find_by_users(&[], 20, None).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_users_returns_posts() {
        let p1 = create_test_post("post2", "user1");
        let p2 = create_test_post("post1", "user2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[p1, p2]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo
            .find_by_users(&["user1".to_string(), "user2".to_string()], 20, None)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "post2");
    }
}
