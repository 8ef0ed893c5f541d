//! Search Index Module
//!
//! Eventually-consistent mirror of product text fields. The index produces
//! candidate id sets only; product data is always re-read from the primary
//! store.
//!
//! Matching policy: case-insensitive substring match on `name` OR
//! `description`. Leading and trailing whitespace of the query is trimmed
//! before matching, so a blank query matches every document.

mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Product;

pub use memory::MemorySearchIndex;

// == Search Document ==
/// The indexed text of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// The full set of indexed fields, always sent together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFields {
    pub name: String,
    pub description: String,
}

impl From<&Product> for SearchFields {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
        }
    }
}

/// Applies the matching policy to a pair of text fields.
///
/// The query is trimmed first: `" lamp "` matches exactly what `"lamp"` does.
pub fn matches_query(name: &str, description: &str, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&needle) || description.to_lowercase().contains(&needle)
}

// == Search Index ==
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Adds the document for a newly created product.
    async fn index_document(&self, id: &str, fields: SearchFields) -> Result<()>;

    /// Replaces the document of an existing product, creating it if absent.
    async fn update_document(&self, id: &str, fields: SearchFields) -> Result<()>;

    /// Removes a document. Removing an unknown id is not an error.
    async fn delete_document(&self, id: &str) -> Result<()>;

    /// Ids of matching documents, ordered by id.
    async fn search(&self, query: &str) -> Result<Vec<String>>;
}
