//! Entity Store Module
//!
//! Uniform CRUD façade over the primary store. Reads return entity views
//! with their relations eagerly loaded. The primary store is the only
//! authoritative store and the only one that enforces uniqueness and
//! referential constraints.

mod memory;

use async_trait::async_trait;

use crate::error::{EntityKind, Result};
use crate::models::{
    Category, CategoryDetail, CategoryListing, CreateCategory, CreateProduct, CreateUser, Product,
    UpdateCategory, UpdateProduct, UpdateUser, User,
};

pub use memory::MemoryStore;

/// Async CRUD interface for the three entity kinds.
///
/// Ids are assigned by the store. Update methods return `None` when the
/// target does not exist; delete methods return whether a row was removed.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Point lookup without loading relations.
    async fn exists(&self, kind: EntityKind, id: &str) -> Result<bool>;

    // === Category Operations ===

    /// The category with its products, each carrying its owner.
    async fn category_get(&self, id: &str) -> Result<Option<CategoryDetail>>;

    /// Every category with its products' columns.
    async fn category_list(&self) -> Result<Vec<CategoryListing>>;

    async fn category_insert(&self, input: CreateCategory) -> Result<Category>;

    async fn category_update(&self, id: &str, patch: UpdateCategory) -> Result<Option<Category>>;

    /// Fails with Conflict while products still reference the category.
    async fn category_delete(&self, id: &str) -> Result<bool>;

    // === Product Operations ===

    async fn product_get(&self, id: &str) -> Result<Option<Product>>;

    async fn product_list(&self) -> Result<Vec<Product>>;

    /// Products for the given ids, in the given order. Unknown ids are skipped.
    async fn product_find_many(&self, ids: &[String]) -> Result<Vec<Product>>;

    async fn product_insert(&self, input: CreateProduct) -> Result<Product>;

    async fn product_update(&self, id: &str, patch: UpdateProduct) -> Result<Option<Product>>;

    async fn product_delete(&self, id: &str) -> Result<bool>;

    // === User Operations ===

    async fn user_get(&self, id: &str) -> Result<Option<User>>;

    /// Case-insensitive lookup by email.
    async fn user_find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn user_list(&self) -> Result<Vec<User>>;

    /// Fails with Conflict if the email is already taken.
    async fn user_insert(&self, input: CreateUser) -> Result<User>;

    async fn user_update(&self, id: &str, patch: UpdateUser) -> Result<Option<User>>;

    /// Detaches the user's products rather than deleting them.
    async fn user_delete(&self, id: &str) -> Result<bool>;
}
