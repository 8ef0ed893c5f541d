//! Referential Validator
//!
//! Existence and availability pre-checks run before a mutation reaches the
//! primary store. Each check is a single point lookup and is not repeated
//! inside the write; the store's own constraints are the authoritative guard.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{CatalogError, EntityKind, Result};
use crate::store::EntityStore;
use crate::timeouts;

#[derive(Clone)]
pub struct ReferentialValidator {
    store: Arc<dyn EntityStore>,
    io_timeout: Duration,
}

impl ReferentialValidator {
    pub fn new(store: Arc<dyn EntityStore>, io_timeout: Duration) -> Self {
        Self { store, io_timeout }
    }

    pub async fn validate_category_exists(&self, id: &str) -> Result<()> {
        self.validate_exists(EntityKind::Category, id).await
    }

    pub async fn validate_user_exists(&self, id: &str) -> Result<()> {
        self.validate_exists(EntityKind::User, id).await
    }

    pub async fn validate_product_exists(&self, id: &str) -> Result<()> {
        self.validate_exists(EntityKind::Product, id).await
    }

    /// Fails with Conflict if another user already holds `email`.
    ///
    /// `excluding_id` lets a user keep its own address on update.
    pub async fn validate_email_available(
        &self,
        email: &str,
        excluding_id: Option<&str>,
    ) -> Result<()> {
        let owner = timeouts::primary(
            self.io_timeout,
            "look up email",
            self.store.user_find_by_email(email),
        )
        .await?;

        match owner {
            Some(user) if Some(user.id.as_str()) != excluding_id => {
                Err(CatalogError::email_taken(email))
            }
            _ => Ok(()),
        }
    }

    async fn validate_exists(&self, kind: EntityKind, id: &str) -> Result<()> {
        let found = timeouts::primary(
            self.io_timeout,
            "check reference",
            self.store.exists(kind, id),
        )
        .await?;

        if found {
            Ok(())
        } else {
            Err(CatalogError::not_found(kind, id))
        }
    }
}
