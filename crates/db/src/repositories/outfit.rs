//! Outfit repository.

use std::sync::Arc;

use crate::entities::{Outfit, outfit};
use curator_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Outfit repository for database operations.
#[derive(Clone)]
pub struct OutfitRepository {
    db: Arc<DatabaseConnection>,
}

impl OutfitRepository {
    /// Create a new outfit repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an outfit by id.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<outfit::Model>> {
        Outfit::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an outfit by id, failing if it does not exist.
    pub async fn get_by_id(&self, id: &str) -> AppResult<outfit::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::OutfitNotFound(id.to_string()))
    }

    /// Create a new outfit.
    pub async fn create(&self, model: outfit::ActiveModel) -> AppResult<outfit::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Outfits visible to a viewer: public ones plus the viewer's own,
    /// newest first (paginated).
    pub async fn find_visible(
        &self,
        viewer_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<outfit::Model>> {
        let mut query = Outfit::find()
            .filter(
                Condition::any()
                    .add(outfit::Column::IsPublic.eq(true))
                    .add(outfit::Column::UserId.eq(viewer_id)),
            )
            .order_by_desc(outfit::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(outfit::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
