//! Product operations

use tracing::{debug, info};

use super::{Catalog, PRODUCT_VIEWS};
use crate::cache::CacheKey;
use crate::error::{CatalogError, EntityKind, Result};
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::search::{matches_query, SearchFields};
use crate::timeouts;

impl Catalog {
    /// Every product with its category and owner, read through the cache.
    pub async fn get_products(&self) -> Result<Vec<Product>> {
        self.read_through(CacheKey::AllProducts, "list products", self.store.product_list())
            .await
    }

    pub async fn get_product(&self, id: &str) -> Result<Product> {
        self.primary("get product", self.store.product_get(id))
            .await?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Product, id))
    }

    /// Products whose name or description contains `query`, ignoring case.
    ///
    /// The index only nominates ids. Records come from the primary store and
    /// are matched again there, so a lagging index can neither resurrect a
    /// deleted product nor return one whose text no longer matches.
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>> {
        let ids = timeouts::derived(self.io_timeout, "search products", self.index.search(query))
            .await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self
            .primary("fetch search results", self.store.product_find_many(&ids))
            .await?;
        let nominated = candidates.len();

        let products: Vec<Product> = candidates
            .into_iter()
            .filter(|p| matches_query(&p.name, &p.description, query))
            .collect();

        if products.len() < ids.len() {
            debug!(
                "Search for {:?}: index nominated {} ids, {} live, {} still matching",
                query,
                ids.len(),
                nominated,
                products.len()
            );
        }
        Ok(products)
    }

    pub async fn create_product(&self, input: CreateProduct) -> Result<Product> {
        self.validator
            .validate_category_exists(&input.category_id)
            .await?;
        if let Some(user_id) = &input.user_id {
            self.validator.validate_user_exists(user_id).await?;
        }

        let product = self
            .primary("create product", self.store.product_insert(input))
            .await?;
        info!("Created product {}", product.id);

        self.invalidate(PRODUCT_VIEWS).await;
        self.sync_index(
            "index product",
            self.index
                .index_document(&product.id, SearchFields::from(&product)),
        )
        .await;

        Ok(product)
    }

    /// Applies a partial update.
    ///
    /// The cache is cleared before the primary write. When the patch touches
    /// indexed text, the index receives the full text of the updated product.
    pub async fn update_product(&self, id: &str, patch: UpdateProduct) -> Result<Product> {
        self.validator.validate_product_exists(id).await?;
        if let Some(category_id) = &patch.category_id {
            self.validator.validate_category_exists(category_id).await?;
        }
        if let Some(user_id) = &patch.user_id {
            self.validator.validate_user_exists(user_id).await?;
        }
        let reindex = patch.touches_search_fields();

        self.invalidate(PRODUCT_VIEWS).await;

        let product = self
            .primary("update product", self.store.product_update(id, patch))
            .await?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Product, id))?;
        info!("Updated product {}", product.id);

        if reindex {
            self.sync_index(
                "reindex product",
                self.index
                    .update_document(&product.id, SearchFields::from(&product)),
            )
            .await;
        }

        Ok(product)
    }

    pub async fn delete_product(&self, id: &str) -> Result<bool> {
        self.validator.validate_product_exists(id).await?;

        let deleted = self
            .primary("delete product", self.store.product_delete(id))
            .await?;
        if !deleted {
            // removed by a concurrent request since the existence check
            return Err(CatalogError::not_found(EntityKind::Product, id));
        }
        info!("Deleted product {}", id);

        self.invalidate(PRODUCT_VIEWS).await;
        self.sync_index("remove product from index", self.index.delete_document(id))
            .await;

        Ok(true)
    }
}
