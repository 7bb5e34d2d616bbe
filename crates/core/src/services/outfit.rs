//! Outfit service.

use curator_common::{AppError, AppResult, IdGenerator};
use curator_db::{entities::outfit, repositories::OutfitRepository};
use sea_orm::Set;

/// Input for creating an outfit.
#[derive(Debug, Clone)]
pub struct CreateOutfitInput {
    /// Outfit name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Occasion label.
    pub occasion: Option<String>,
    /// Season label.
    pub season: Option<String>,
    /// Visibility.
    pub is_public: bool,
}

/// Outfit service for business logic.
#[derive(Clone)]
pub struct OutfitService {
    outfit_repo: OutfitRepository,
    id_gen: IdGenerator,
}

impl OutfitService {
    /// Create a new outfit service.
    #[must_use]
    pub fn new(outfit_repo: OutfitRepository) -> Self {
        Self {
            outfit_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an outfit.
    pub async fn create(&self, user_id: &str, input: CreateOutfitInput) -> AppResult<outfit::Model> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name cannot be empty".to_string()));
        }

        let model = outfit::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            name: Set(name.to_string()),
            description: Set(input.description),
            occasion: Set(input.occasion),
            season: Set(input.season),
            is_public: Set(input.is_public),
            ..Default::default()
        };

        self.outfit_repo.create(model).await
    }

    /// Get an outfit by id. Private outfits are visible to their owner only.
    pub async fn get(&self, viewer_id: &str, id: &str) -> AppResult<outfit::Model> {
        let outfit = self.outfit_repo.get_by_id(id).await?;

        if !outfit.is_public && outfit.user_id != viewer_id {
            return Err(AppError::OutfitNotFound(id.to_string()));
        }

        Ok(outfit)
    }

    /// List outfits visible to the viewer.
    pub async fn list(
        &self,
        viewer_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<outfit::Model>> {
        self.outfit_repo.find_visible(viewer_id, limit, until_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_outfit(id: &str, user_id: &str, is_public: bool) -> outfit::Model {
        outfit::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            name: "Weekend look".to_string(),
            description: None,
            occasion: None,
            season: None,
            is_public,
            likes_count: 0,
            saves_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_empty_name() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = OutfitService::new(OutfitRepository::new(db));

        let input = CreateOutfitInput {
            name: " ".to_string(),
            description: None,
            occasion: None,
            season: None,
            is_public: true,
        };
        let result = service.create("user1", input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_private_outfit_hidden_from_others() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_outfit("o1", "owner1", false)]])
                .into_connection(),
        );
        let service = OutfitService::new(OutfitRepository::new(db));

        let result = service.get("stranger", "o1").await;

        assert!(matches!(result, Err(AppError::OutfitNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_private_outfit_visible_to_owner() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_outfit("o1", "owner1", false)]])
                .into_connection(),
        );
        let service = OutfitService::new(OutfitRepository::new(db));

        let result = service.get("owner1", "o1").await.unwrap();

        assert_eq!(result.id, "o1");
    }
}
