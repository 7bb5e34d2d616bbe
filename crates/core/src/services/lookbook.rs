//! Lookbook service.

use curator_common::{AppError, AppResult, IdGenerator};
use curator_db::{entities::lookbook, repositories::LookbookRepository};
use sea_orm::Set;

/// Input for creating a lookbook.
#[derive(Debug, Clone)]
pub struct CreateLookbookInput {
    /// Lookbook title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Visibility.
    pub is_public: bool,
}

/// Lookbook service for business logic.
#[derive(Clone)]
pub struct LookbookService {
    lookbook_repo: LookbookRepository,
    id_gen: IdGenerator,
}

impl LookbookService {
    /// Create a new lookbook service.
    #[must_use]
    pub fn new(lookbook_repo: LookbookRepository) -> Self {
        Self {
            lookbook_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a lookbook.
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateLookbookInput,
    ) -> AppResult<lookbook::Model> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Title cannot be empty".to_string()));
        }

        let model = lookbook::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            title: Set(title.to_string()),
            description: Set(input.description),
            is_public: Set(input.is_public),
            ..Default::default()
        };

        self.lookbook_repo.create(model).await
    }

    /// Get a lookbook by id. Private lookbooks are visible to their owner only.
    pub async fn get(&self, viewer_id: &str, id: &str) -> AppResult<lookbook::Model> {
        let lookbook = self.lookbook_repo.get_by_id(id).await?;

        if !lookbook.is_public && lookbook.user_id != viewer_id {
            return Err(AppError::LookbookNotFound(id.to_string()));
        }

        Ok(lookbook)
    }

    /// List lookbooks visible to the viewer, featured first.
    pub async fn list(
        &self,
        viewer_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<lookbook::Model>> {
        self.lookbook_repo
            .find_visible(viewer_id, limit, until_id)
            .await
    }
}
