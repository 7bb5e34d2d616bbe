//! Post service.

use curator_common::{AppError, AppResult, IdGenerator};
use curator_db::{
    entities::post,
    repositories::{InteractionRepository, PostRepository},
};
use sea_orm::Set;

/// Maximum caption length in characters.
const MAX_CAPTION_LENGTH: usize = 2200;

/// Which feed to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedType {
    /// Posts from followed users.
    #[default]
    Following,
    /// Public posts from everyone else.
    Discover,
    /// Public posts ranked by engagement.
    Trending,
}

impl FeedType {
    /// Parse a feed type from its query-string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "following" => Some(Self::Following),
            "discover" => Some(Self::Discover),
            "trending" => Some(Self::Trending),
            _ => None,
        }
    }
}

/// Input for creating a post.
#[derive(Debug, Clone)]
pub struct CreatePostInput {
    /// Caption text.
    pub caption: String,
    /// Hashtags.
    pub tags: Vec<String>,
    /// Optional outfit to showcase.
    pub outfit_id: Option<String>,
    /// Privacy level.
    pub privacy: post::Privacy,
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    interaction_repo: InteractionRepository,
    server_url: String,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(
        post_repo: PostRepository,
        interaction_repo: InteractionRepository,
        server_url: String,
    ) -> Self {
        Self {
            post_repo,
            interaction_repo,
            server_url,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a post.
    pub async fn create(&self, user_id: &str, input: CreatePostInput) -> AppResult<post::Model> {
        let caption = input.caption.trim();
        if caption.is_empty() {
            return Err(AppError::Validation("Caption cannot be empty".to_string()));
        }
        if caption.chars().count() > MAX_CAPTION_LENGTH {
            return Err(AppError::Validation(format!(
                "Caption exceeds {MAX_CAPTION_LENGTH} characters"
            )));
        }

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            caption: Set(caption.to_string()),
            tags: Set(serde_json::json!(input.tags)),
            outfit_id: Set(input.outfit_id),
            privacy: Set(input.privacy),
            ..Default::default()
        };

        self.post_repo.create(model).await
    }

    /// Get a post by id.
    pub async fn get(&self, id: &str) -> AppResult<post::Model> {
        self.post_repo.get_by_id(id).await
    }

    /// Get a post by id, recording the view.
    pub async fn view(&self, id: &str) -> AppResult<post::Model> {
        let mut post = self.post_repo.get_by_id(id).await?;

        // A lost view increment is not worth failing the read
        match self.post_repo.increment_views_count(id).await {
            Ok(()) => post.views_count += 1,
            Err(e) => {
                tracing::warn!(post_id = %id, error = %e, "Failed to record post view");
            }
        }

        Ok(post)
    }

    /// Get the viewer's feed.
    pub async fn get_feed(
        &self,
        user_id: &str,
        feed: FeedType,
        limit: u64,
        until_id: Option<&str>,
        offset: u64,
    ) -> AppResult<Vec<post::Model>> {
        match feed {
            FeedType::Following => {
                let following = self.interaction_repo.find_following_ids(user_id).await?;
                self.post_repo.find_by_users(&following, limit, until_id).await
            }
            FeedType::Discover => {
                self.post_repo
                    .find_public_excluding(user_id, limit, until_id)
                    .await
            }
            FeedType::Trending => self.post_repo.find_trending(limit, offset).await,
        }
    }

    /// Record a share of a post and return its share URL.
    ///
    /// Reads the post back after the increment so the reported count is
    /// the stored value, not a stale in-memory one.
    pub async fn share(&self, id: &str) -> AppResult<(post::Model, String)> {
        self.post_repo.increment_shares_count(id).await?;
        let post = self.post_repo.get_by_id(id).await?;

        let share_url = format!("{}/posts/{}", self.server_url, post.id);
        Ok((post, share_url))
    }

    /// Soft-delete a post. Only the author may delete it.
    pub async fn delete(&self, user_id: &str, id: &str) -> AppResult<()> {
        let post = self.post_repo.get_by_id(id).await?;

        if post.user_id != user_id {
            return Err(AppError::Forbidden(
                "Only the author can delete this post".to_string(),
            ));
        }

        self.post_repo.soft_delete(post).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn empty_db() -> Arc<DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn build_service(post_db: Arc<DatabaseConnection>) -> PostService {
        PostService::new(
            PostRepository::new(post_db),
            InteractionRepository::new(empty_db()),
            "https://curator.example".to_string(),
        )
    }

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

    #[test]
    fn test_feed_type_parse() {
        assert_eq!(FeedType::parse("following"), Some(FeedType::Following));
        assert_eq!(FeedType::parse("discover"), Some(FeedType::Discover));
        assert_eq!(FeedType::parse("trending"), Some(FeedType::Trending));
        assert_eq!(FeedType::parse("bogus"), None);
    }

    #[tokio::test]
    async fn test_create_empty_caption() {
        let service = build_service(empty_db());

        let input = CreatePostInput {
            caption: "   ".to_string(),
            tags: vec![],
            outfit_id: None,
            privacy: post::Privacy::Public,
        };
        let result = service.create("user1", input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_caption_too_long() {
        let service = build_service(empty_db());

        let input = CreatePostInput {
            caption: "a".repeat(MAX_CAPTION_LENGTH + 1),
            tags: vec![],
            outfit_id: None,
            privacy: post::Privacy::Public,
        };
        let result = service.create("user1", input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_not_author() {
        let post = create_test_post("post1", "author1");

        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .into_connection(),
        );

        let service = build_service(post_db);
        let result = service.delete("someone-else", "post1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_share_not_found() {
        // The increment matches no rows; the read-back raises the 404
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let service = build_service(post_db);
        let result = service.share("missing").await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_share_reports_stored_count() {
        // The returned count is read back after the increment, never
        // computed in memory from a pre-increment row
        let mut post = create_test_post("post1", "author1");
        post.shares_count = 4;

        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[post]])
                .into_connection(),
        );

        let service = build_service(post_db);
        let (shared, share_url) = service.share("post1").await.unwrap();

        assert_eq!(shared.shares_count, 4);
        assert_eq!(share_url, "https://curator.example/posts/post1");
    }
}
