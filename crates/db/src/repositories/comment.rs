//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, comment};
use curator_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Sort order for top-level comment listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentSort {
    /// Newest first.
    #[default]
    Recent,
    /// Most liked first.
    Popular,
}

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a live (non-deleted) comment by id.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .filter(comment::Column::IsDeleted.eq(false))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a live comment by id, failing if it does not exist.
    pub async fn get_by_id(&self, id: &str) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::CommentNotFound(id.to_string()))
    }

    /// Create a new comment inside an existing transaction or connection.
    pub async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: comment::ActiveModel,
    ) -> AppResult<comment::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Soft-delete a comment inside an existing transaction or connection.
    pub async fn soft_delete_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        comment: comment::Model,
    ) -> AppResult<()> {
        let mut active: comment::ActiveModel = comment.into();
        active.is_deleted = Set(true);
        active
            .update(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Top-level comments on a post (paginated).
    pub async fn find_top_level(
        &self,
        post_id: &str,
        sort: CommentSort,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<comment::Model>> {
        let mut query = Comment::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::ParentCommentId.is_null())
            .filter(comment::Column::IsDeleted.eq(false));

        query = match sort {
            CommentSort::Recent => query.order_by_desc(comment::Column::Id),
            CommentSort::Popular => query
                .order_by_desc(comment::Column::LikesCount)
                .order_by_desc(comment::Column::Id),
        };

        if let Some(id) = until_id {
            query = query.filter(comment::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// The first few replies to a comment, oldest first.
    pub async fn find_replies(
        &self,
        parent_comment_id: &str,
        limit: u64,
    ) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::ParentCommentId.eq(parent_comment_id))
            .filter(comment::Column::IsDeleted.eq(false))
            .order_by_asc(comment::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_comment(id: &str, post_id: &str, parent: Option<&str>) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            post_id: post_id.to_string(),
            user_id: "user1".to_string(),
            content: "nice fit".to_string(),
            parent_comment_id: parent.map(ToString::to_string),
            likes_count: 0,
            is_deleted: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let comment = create_test_comment("c1", "post1", None);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.get_by_id("c1").await.unwrap();

        assert_eq!(result.content, "nice fit");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::CommentNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_top_level() {
        let c1 = create_test_comment("c2", "post1", None);
        let c2 = create_test_comment("c1", "post1", None);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c1, c2]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo
            .find_top_level("post1", CommentSort::Recent, 20, None)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "c2");
    }

    #[tokio::test]
    async fn test_find_replies() {
        let r1 = create_test_comment("c3", "post1", Some("c1"));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.find_replies("c1", 3).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].parent_comment_id.as_deref(), Some("c1"));
    }
}
