//! Category operations
//!
//! Categories are never cached as a list; they reach the cache only embedded
//! in products.

use tracing::info;

use super::{Catalog, PRODUCT_VIEWS};
use crate::error::{CatalogError, EntityKind, Result};
use crate::models::{Category, CategoryDetail, CategoryListing, CreateCategory, UpdateCategory};

impl Catalog {
    /// The category with its products and their owners.
    pub async fn get_category(&self, id: &str) -> Result<CategoryDetail> {
        self.primary("get category", self.store.category_get(id))
            .await?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Category, id))
    }

    pub async fn get_categories(&self) -> Result<Vec<CategoryListing>> {
        self.primary("list categories", self.store.category_list())
            .await
    }

    pub async fn create_category(&self, input: CreateCategory) -> Result<Category> {
        let category = self
            .primary("create category", self.store.category_insert(input))
            .await?;
        info!("Created category {}", category.id);
        Ok(category)
    }

    pub async fn update_category(&self, id: &str, patch: UpdateCategory) -> Result<Category> {
        self.validator.validate_category_exists(id).await?;

        let category = self
            .primary("update category", self.store.category_update(id, patch))
            .await?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Category, id))?;
        info!("Updated category {}", category.id);

        // cached products carry the category name
        self.invalidate(PRODUCT_VIEWS).await;
        Ok(category)
    }

    /// Deletes a category. Fails with Conflict while products reference it.
    pub async fn delete_category(&self, id: &str) -> Result<bool> {
        self.validator.validate_category_exists(id).await?;

        let deleted = self
            .primary("delete category", self.store.category_delete(id))
            .await?;
        if !deleted {
            return Err(CatalogError::not_found(EntityKind::Category, id));
        }
        info!("Deleted category {}", id);

        self.invalidate(PRODUCT_VIEWS).await;
        Ok(true)
    }
}
