//! In-process primary store
//!
//! Relational tables keyed by store-assigned UUID v7 ids, so id order is
//! creation order. Enforces the constraints a relational schema would:
//! unique user email, product foreign keys, restrict on category delete and
//! set-null on user delete.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::EntityStore;
use crate::error::{CatalogError, EntityKind, Result};
use crate::models::{
    Category, CategoryDetail, CategoryListing, CreateCategory, CreateProduct, CreateUser,
    OwnedProduct, Product, ProductSummary, ProductWithoutUser, UpdateCategory, UpdateProduct,
    UpdateUser, User, UserSummary,
};

#[derive(Debug, Clone)]
struct ProductRow {
    id: String,
    name: String,
    description: String,
    value: Decimal,
    category_id: String,
    user_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct UserRow {
    id: String,
    email: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<String, Category>,
    products: BTreeMap<String, ProductRow>,
    users: BTreeMap<String, UserRow>,
}

impl Tables {
    fn category_of(&self, row: &ProductRow) -> Result<Category> {
        self.categories.get(&row.category_id).cloned().ok_or_else(|| {
            CatalogError::Store(format!(
                "Product '{}' references missing category '{}'",
                row.id, row.category_id
            ))
        })
    }

    fn owner_of(&self, row: &ProductRow) -> Option<UserSummary> {
        row.user_id
            .as_ref()
            .and_then(|id| self.users.get(id))
            .map(|u| UserSummary {
                id: u.id.clone(),
                name: u.name.clone(),
                email: u.email.clone(),
            })
    }

    fn products_in<'a>(&'a self, category_id: &'a str) -> impl Iterator<Item = &'a ProductRow> {
        self.products
            .values()
            .filter(move |p| p.category_id == category_id)
    }

    fn product_summary(row: &ProductRow) -> ProductSummary {
        ProductSummary {
            id: row.id.clone(),
            name: row.name.clone(),
            description: row.description.clone(),
            value: row.value,
            category_id: row.category_id.clone(),
            user_id: row.user_id.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn category_detail(&self, category: &Category) -> CategoryDetail {
        let products = self
            .products_in(&category.id)
            .map(|row| OwnedProduct {
                product: Self::product_summary(row),
                user: self.owner_of(row),
            })
            .collect();

        CategoryDetail {
            id: category.id.clone(),
            name: category.name.clone(),
            products,
        }
    }

    fn category_listing(&self, category: &Category) -> CategoryListing {
        CategoryListing {
            id: category.id.clone(),
            name: category.name.clone(),
            products: self.products_in(&category.id).map(Self::product_summary).collect(),
        }
    }

    fn product_view(&self, row: &ProductRow) -> Result<Product> {
        let user = self.owner_of(row);

        Ok(Product {
            id: row.id.clone(),
            name: row.name.clone(),
            description: row.description.clone(),
            value: row.value,
            category_id: row.category_id.clone(),
            category: self.category_of(row)?,
            user_id: row.user_id.clone(),
            user,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn nested_product_view(&self, row: &ProductRow) -> Result<ProductWithoutUser> {
        Ok(ProductWithoutUser {
            id: row.id.clone(),
            name: row.name.clone(),
            description: row.description.clone(),
            value: row.value,
            category_id: row.category_id.clone(),
            category: self.category_of(row)?,
            user_id: row.user_id.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn user_view(&self, row: &UserRow) -> Result<User> {
        let products = self
            .products
            .values()
            .filter(|p| p.user_id.as_deref() == Some(row.id.as_str()))
            .map(|p| self.nested_product_view(p))
            .collect::<Result<Vec<_>>>()?;

        Ok(User {
            id: row.id.clone(),
            email: row.email.clone(),
            name: row.name.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
            products,
        })
    }

    fn email_owner(&self, email: &str) -> Option<&UserRow> {
        self.users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    fn check_product_refs(&self, category_id: Option<&str>, user_id: Option<&str>) -> Result<()> {
        if let Some(id) = category_id {
            if !self.categories.contains_key(id) {
                return Err(CatalogError::not_found(EntityKind::Category, id));
            }
        }
        if let Some(id) = user_id {
            if !self.users.contains_key(id) {
                return Err(CatalogError::not_found(EntityKind::User, id));
            }
        }
        Ok(())
    }
}

fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// Primary store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn exists(&self, kind: EntityKind, id: &str) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(match kind {
            EntityKind::Category => tables.categories.contains_key(id),
            EntityKind::Product => tables.products.contains_key(id),
            EntityKind::User => tables.users.contains_key(id),
        })
    }

    // == Categories ==

    async fn category_get(&self, id: &str) -> Result<Option<CategoryDetail>> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .get(id)
            .map(|category| tables.category_detail(category)))
    }

    async fn category_list(&self) -> Result<Vec<CategoryListing>> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .map(|category| tables.category_listing(category))
            .collect())
    }

    async fn category_insert(&self, input: CreateCategory) -> Result<Category> {
        let category = Category {
            id: new_id(),
            name: input.name,
        };
        self.tables
            .write()
            .await
            .categories
            .insert(category.id.clone(), category.clone());
        Ok(category)
    }

    async fn category_update(&self, id: &str, patch: UpdateCategory) -> Result<Option<Category>> {
        let mut tables = self.tables.write().await;
        let Some(category) = tables.categories.get_mut(id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            category.name = name;
        }
        Ok(Some(category.clone()))
    }

    async fn category_delete(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let referencing = tables.products_in(id).count();
        if referencing > 0 {
            return Err(CatalogError::Conflict(format!(
                "Category with id '{}' still has {} product(s)",
                id, referencing
            )));
        }
        Ok(tables.categories.remove(id).is_some())
    }

    // == Products ==

    async fn product_get(&self, id: &str) -> Result<Option<Product>> {
        let tables = self.tables.read().await;
        tables
            .products
            .get(id)
            .map(|row| tables.product_view(row))
            .transpose()
    }

    async fn product_list(&self) -> Result<Vec<Product>> {
        let tables = self.tables.read().await;
        tables
            .products
            .values()
            .map(|row| tables.product_view(row))
            .collect()
    }

    async fn product_find_many(&self, ids: &[String]) -> Result<Vec<Product>> {
        let tables = self.tables.read().await;
        ids.iter()
            .filter_map(|id| tables.products.get(id))
            .map(|row| tables.product_view(row))
            .collect()
    }

    async fn product_insert(&self, input: CreateProduct) -> Result<Product> {
        let mut tables = self.tables.write().await;
        tables.check_product_refs(Some(&input.category_id), input.user_id.as_deref())?;

        let now = Utc::now();
        let row = ProductRow {
            id: new_id(),
            name: input.name,
            description: input.description,
            value: input.value,
            category_id: input.category_id,
            user_id: input.user_id,
            created_at: now,
            updated_at: now,
        };
        let product = tables.product_view(&row)?;
        tables.products.insert(row.id.clone(), row);
        Ok(product)
    }

    async fn product_update(&self, id: &str, patch: UpdateProduct) -> Result<Option<Product>> {
        let mut tables = self.tables.write().await;
        tables.check_product_refs(patch.category_id.as_deref(), patch.user_id.as_deref())?;

        let Some(row) = tables.products.get_mut(id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            row.name = name;
        }
        if let Some(description) = patch.description {
            row.description = description;
        }
        if let Some(value) = patch.value {
            row.value = value;
        }
        if let Some(category_id) = patch.category_id {
            row.category_id = category_id;
        }
        if let Some(user_id) = patch.user_id {
            row.user_id = Some(user_id);
        }
        row.updated_at = Utc::now();

        let row = row.clone();
        tables.product_view(&row).map(Some)
    }

    async fn product_delete(&self, id: &str) -> Result<bool> {
        Ok(self.tables.write().await.products.remove(id).is_some())
    }

    // == Users ==

    async fn user_get(&self, id: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(id)
            .map(|row| tables.user_view(row))
            .transpose()
    }

    async fn user_find_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        tables
            .email_owner(email)
            .map(|row| tables.user_view(row))
            .transpose()
    }

    async fn user_list(&self) -> Result<Vec<User>> {
        let tables = self.tables.read().await;
        tables.users.values().map(|row| tables.user_view(row)).collect()
    }

    async fn user_insert(&self, input: CreateUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.email_owner(&input.email).is_some() {
            return Err(CatalogError::email_taken(&input.email));
        }

        let now = Utc::now();
        let row = UserRow {
            id: new_id(),
            email: input.email,
            name: input.name,
            created_at: now,
            updated_at: now,
        };
        let user = tables.user_view(&row)?;
        tables.users.insert(row.id.clone(), row);
        Ok(user)
    }

    async fn user_update(&self, id: &str, patch: UpdateUser) -> Result<Option<User>> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &patch.email {
            if tables.email_owner(email).is_some_and(|owner| owner.id != id) {
                return Err(CatalogError::email_taken(email));
            }
        }

        let Some(row) = tables.users.get_mut(id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            row.name = name;
        }
        if let Some(email) = patch.email {
            row.email = email;
        }
        row.updated_at = Utc::now();

        let row = row.clone();
        tables.user_view(&row).map(Some)
    }

    async fn user_delete(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(id).is_none() {
            return Ok(false);
        }

        let now = Utc::now();
        for product in tables.products.values_mut() {
            if product.user_id.as_deref() == Some(id) {
                product.user_id = None;
                product.updated_at = now;
            }
        }
        Ok(true)
    }
}
