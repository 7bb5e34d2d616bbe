//! Lookbook repository.

use std::sync::Arc;

use crate::entities::{Lookbook, lookbook};
use curator_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Lookbook repository for database operations.
#[derive(Clone)]
pub struct LookbookRepository {
    db: Arc<DatabaseConnection>,
}

impl LookbookRepository {
    /// Create a new lookbook repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a lookbook by id.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<lookbook::Model>> {
        Lookbook::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a lookbook by id, failing if it does not exist.
    pub async fn get_by_id(&self, id: &str) -> AppResult<lookbook::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::LookbookNotFound(id.to_string()))
    }

    /// Create a new lookbook.
    pub async fn create(&self, model: lookbook::ActiveModel) -> AppResult<lookbook::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Lookbooks visible to a viewer: public ones plus the viewer's own,
    /// featured first, then newest (paginated).
    pub async fn find_visible(
        &self,
        viewer_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<lookbook::Model>> {
        let mut query = Lookbook::find()
            .filter(
                Condition::any()
                    .add(lookbook::Column::IsPublic.eq(true))
                    .add(lookbook::Column::UserId.eq(viewer_id)),
            )
            .order_by_desc(lookbook::Column::IsFeatured)
            .order_by_desc(lookbook::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(lookbook::Column::Id.lt(id));
        }

        query
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

    fn create_test_lookbook(id: &str, user_id: &str) -> lookbook::Model {
        lookbook::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Spring staples".to_string(),
            description: None,
            is_public: true,
            is_featured: false,
            likes_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let lookbook = create_test_lookbook("lb1", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[lookbook]])
                .into_connection(),
        );

        let repo = LookbookRepository::new(db);
        let result = repo.get_by_id("lb1").await.unwrap();

        assert_eq!(result.title, "Spring staples");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<lookbook::Model>::new()])
                .into_connection(),
        );

        let repo = LookbookRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::LookbookNotFound(_))));
    }
}
