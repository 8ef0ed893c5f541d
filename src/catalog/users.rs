//! User operations

use tracing::info;

use super::Catalog;
use crate::cache::CacheKey;
use crate::error::{CatalogError, EntityKind, Result};
use crate::models::{CreateUser, UpdateUser, User};

/// Every list embeds user data: users directly, products through their owner summary.
const USER_VIEWS: &[CacheKey] = &[CacheKey::AllUsers, CacheKey::AllProducts];

impl Catalog {
    /// Every user with its products, read through the cache.
    pub async fn get_users(&self) -> Result<Vec<User>> {
        self.read_through(CacheKey::AllUsers, "list users", self.store.user_list())
            .await
    }

    pub async fn get_user(&self, id: &str) -> Result<User> {
        self.primary("get user", self.store.user_get(id))
            .await?
            .ok_or_else(|| CatalogError::not_found(EntityKind::User, id))
    }

    /// Creates a user. The email pre-check gives a friendly Conflict; the
    /// store's uniqueness constraint still rejects a racing duplicate.
    pub async fn create_user(&self, input: CreateUser) -> Result<User> {
        self.validator
            .validate_email_available(&input.email, None)
            .await?;

        let user = self
            .primary("create user", self.store.user_insert(input))
            .await?;
        info!("Created user {}", user.id);

        // A new user owns no products yet, so the product list is unaffected.
        self.invalidate(&[CacheKey::AllUsers]).await;
        Ok(user)
    }

    pub async fn update_user(&self, id: &str, patch: UpdateUser) -> Result<User> {
        self.validator.validate_user_exists(id).await?;
        if let Some(email) = &patch.email {
            self.validator
                .validate_email_available(email, Some(id))
                .await?;
        }

        let user = self
            .primary("update user", self.store.user_update(id, patch))
            .await?
            .ok_or_else(|| CatalogError::not_found(EntityKind::User, id))?;
        info!("Updated user {}", user.id);

        self.invalidate(USER_VIEWS).await;
        Ok(user)
    }

    /// Deletes a user; its products stay, detached.
    pub async fn delete_user(&self, id: &str) -> Result<bool> {
        self.validator.validate_user_exists(id).await?;

        let deleted = self
            .primary("delete user", self.store.user_delete(id))
            .await?;
        if !deleted {
            return Err(CatalogError::not_found(EntityKind::User, id));
        }
        info!("Deleted user {}", id);

        self.invalidate(USER_VIEWS).await;
        Ok(true)
    }
}
