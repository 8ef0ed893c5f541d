//! In-memory search index

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{matches_query, SearchDocument, SearchFields, SearchIndex};
use crate::error::Result;

/// Search index holding documents in id order.
#[derive(Debug, Default)]
pub struct MemorySearchIndex {
    documents: RwLock<BTreeMap<String, SearchDocument>>,
}

impl MemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn document(&self, id: &str) -> Option<SearchDocument> {
        self.documents.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    async fn put(&self, id: &str, fields: SearchFields) {
        let document = SearchDocument {
            id: id.to_string(),
            name: fields.name,
            description: fields.description,
        };
        self.documents.write().await.insert(id.to_string(), document);
    }
}

#[async_trait]
impl SearchIndex for MemorySearchIndex {
    async fn index_document(&self, id: &str, fields: SearchFields) -> Result<()> {
        self.put(id, fields).await;
        Ok(())
    }

    async fn update_document(&self, id: &str, fields: SearchFields) -> Result<()> {
        self.put(id, fields).await;
        Ok(())
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        self.documents.write().await.remove(id);
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<String>> {
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .filter(|doc| matches_query(&doc.name, &doc.description, query))
            .map(|doc| doc.id.clone())
            .collect())
    }
}
