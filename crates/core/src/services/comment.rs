//! Comment service.

use std::sync::Arc;

use curator_common::{AppError, AppResult, IdGenerator};
use curator_db::{
    entities::comment,
    repositories::{CommentRepository, CommentSort, PostRepository},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};

/// Maximum comment length in characters.
const MAX_COMMENT_LENGTH: usize = 500;

/// How many replies to inline under each top-level comment.
const REPLY_PREVIEW_LIMIT: u64 = 3;

/// A top-level comment with a preview of its replies.
#[derive(Debug, Clone)]
pub struct CommentThread {
    /// The top-level comment.
    pub comment: comment::Model,
    /// The first few replies, oldest first.
    pub replies: Vec<comment::Model>,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    db: Arc<DatabaseConnection>,
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        comment_repo: CommentRepository,
        post_repo: PostRepository,
    ) -> Self {
        Self {
            db,
            comment_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a comment to a post, updating the post's comment counter in
    /// the same transaction.
    pub async fn add(
        &self,
        user_id: &str,
        post_id: &str,
        content: &str,
        parent_comment_id: Option<&str>,
    ) -> AppResult<comment::Model> {
        self.post_repo.get_by_id(post_id).await?;

        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::Validation("Comment cannot be empty".to_string()));
        }
        if content.chars().count() > MAX_COMMENT_LENGTH {
            return Err(AppError::Validation(format!(
                "Comment exceeds {MAX_COMMENT_LENGTH} characters"
            )));
        }

        if let Some(parent_id) = parent_comment_id {
            let parent = self.comment_repo.get_by_id(parent_id).await?;
            if parent.post_id != post_id {
                return Err(AppError::BadRequest(
                    "Parent comment belongs to a different post".to_string(),
                ));
            }
            // Two levels only: replies to replies are rejected
            if parent.parent_comment_id.is_some() {
                return Err(AppError::BadRequest(
                    "Cannot reply to a reply".to_string(),
                ));
            }
        }

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post_id.to_string()),
            user_id: Set(user_id.to_string()),
            content: Set(content.to_string()),
            parent_comment_id: Set(parent_comment_id.map(ToString::to_string)),
            ..Default::default()
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = self.comment_repo.create_in(&txn, model).await?;
        self.post_repo.increment_comments_count(&txn, post_id).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }

    /// Get a comment by id.
    pub async fn get(&self, id: &str) -> AppResult<comment::Model> {
        self.comment_repo.get_by_id(id).await
    }

    /// List top-level comments on a post with reply previews.
    pub async fn list(
        &self,
        post_id: &str,
        sort: CommentSort,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<CommentThread>> {
        self.post_repo.get_by_id(post_id).await?;

        let top_level = self
            .comment_repo
            .find_top_level(post_id, sort, limit, until_id)
            .await?;

        let mut threads = Vec::with_capacity(top_level.len());
        for comment in top_level {
            let replies = self
                .comment_repo
                .find_replies(&comment.id, REPLY_PREVIEW_LIMIT)
                .await?;
            threads.push(CommentThread { comment, replies });
        }

        Ok(threads)
    }

    /// Soft-delete a comment, updating the post's comment counter in the
    /// same transaction. The comment author and the post owner may delete.
    pub async fn delete(&self, user_id: &str, comment_id: &str) -> AppResult<()> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;

        if comment.user_id != user_id {
            let post = self.post_repo.get_by_id(&comment.post_id).await?;
            if post.user_id != user_id {
                return Err(AppError::Forbidden(
                    "Only the comment author or post owner can delete this comment".to_string(),
                ));
            }
        }

        let post_id = comment.post_id.clone();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.comment_repo.soft_delete_in(&txn, comment).await?;
        self.post_repo.decrement_comments_count(&txn, &post_id).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
