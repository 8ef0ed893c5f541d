//! Test doubles shared by the integration tests.
//!
//! Each double wraps the real in-process implementation, appends every
//! mutating call to a shared journal (so tests can assert ordering across
//! stores) and can be switched into a failing or stalling mode.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::Notify;

use catalog_sync::cache::{CacheBackend, CacheKey, SharedCache};
use catalog_sync::error::{CatalogError, EntityKind, Result};
use catalog_sync::models::{
    Category, CategoryDetail, CategoryListing, CreateCategory, CreateProduct, CreateUser, Product,
    UpdateCategory, UpdateProduct, UpdateUser, User,
};
use catalog_sync::search::{MemorySearchIndex, SearchFields, SearchIndex};
use catalog_sync::store::{EntityStore, MemoryStore};
use catalog_sync::Catalog;

pub const TEST_IO_TIMEOUT: Duration = Duration::from_millis(200);

// == Journal ==

#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn reset(&self) {
        self.0.lock().unwrap().clear();
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == entry)
    }

    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.entries().iter().any(|e| e.starts_with(prefix))
    }
}

// == Store ==

/// Holds one `product_list` call after it has taken its snapshot.
#[derive(Default)]
pub struct ListGate {
    pub parked: Notify,
    pub release: Notify,
}

pub struct FlakyStore {
    inner: MemoryStore,
    journal: Journal,
    pub fail_writes: AtomicBool,
    list_gate: Mutex<Option<Arc<ListGate>>>,
}

impl FlakyStore {
    /// Parks the next `product_list` between reading and returning.
    pub fn gate_next_product_list(&self) -> Arc<ListGate> {
        let gate = Arc::new(ListGate::default());
        *self.list_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    fn write(&self, op: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CatalogError::Store(format!("{} failed: connection reset", op)));
        }
        self.journal.push(format!("store:{}", op));
        Ok(())
    }
}

#[async_trait]
impl EntityStore for FlakyStore {
    async fn exists(&self, kind: EntityKind, id: &str) -> Result<bool> {
        self.inner.exists(kind, id).await
    }

    async fn category_get(&self, id: &str) -> Result<Option<CategoryDetail>> {
        self.inner.category_get(id).await
    }

    async fn category_list(&self) -> Result<Vec<CategoryListing>> {
        self.inner.category_list().await
    }

    async fn category_insert(&self, input: CreateCategory) -> Result<Category> {
        self.write("category_insert")?;
        self.inner.category_insert(input).await
    }

    async fn category_update(&self, id: &str, patch: UpdateCategory) -> Result<Option<Category>> {
        self.write("category_update")?;
        self.inner.category_update(id, patch).await
    }

    async fn category_delete(&self, id: &str) -> Result<bool> {
        self.write("category_delete")?;
        self.inner.category_delete(id).await
    }

    async fn product_get(&self, id: &str) -> Result<Option<Product>> {
        self.inner.product_get(id).await
    }

    async fn product_list(&self) -> Result<Vec<Product>> {
        self.journal.push("store:product_list");
        let snapshot = self.inner.product_list().await;

        let gate = self.list_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.parked.notify_one();
            gate.release.notified().await;
        }
        snapshot
    }

    async fn product_find_many(&self, ids: &[String]) -> Result<Vec<Product>> {
        self.inner.product_find_many(ids).await
    }

    async fn product_insert(&self, input: CreateProduct) -> Result<Product> {
        self.write("product_insert")?;
        self.inner.product_insert(input).await
    }

    async fn product_update(&self, id: &str, patch: UpdateProduct) -> Result<Option<Product>> {
        self.write("product_update")?;
        self.inner.product_update(id, patch).await
    }

    async fn product_delete(&self, id: &str) -> Result<bool> {
        self.write("product_delete")?;
        self.inner.product_delete(id).await
    }

    async fn user_get(&self, id: &str) -> Result<Option<User>> {
        self.inner.user_get(id).await
    }

    async fn user_find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.inner.user_find_by_email(email).await
    }

    async fn user_list(&self) -> Result<Vec<User>> {
        self.journal.push("store:user_list");
        self.inner.user_list().await
    }

    async fn user_insert(&self, input: CreateUser) -> Result<User> {
        self.write("user_insert")?;
        self.inner.user_insert(input).await
    }

    async fn user_update(&self, id: &str, patch: UpdateUser) -> Result<Option<User>> {
        self.write("user_update")?;
        self.inner.user_update(id, patch).await
    }

    async fn user_delete(&self, id: &str) -> Result<bool> {
        self.write("user_delete")?;
        self.inner.user_delete(id).await
    }
}

// == Cache ==

pub struct ScriptedCache {
    pub inner: SharedCache,
    journal: Journal,
    pub fail: AtomicBool,
    pub stall: AtomicBool,
}

impl ScriptedCache {
    async fn gate(&self, op: String) -> Result<()> {
        if self.stall.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(10)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(CatalogError::DerivedStore(format!("{}: cache unreachable", op)));
        }
        self.journal.push(format!("cache:{}", op));
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for ScriptedCache {
    async fn get(&self, key: CacheKey) -> Result<Option<String>> {
        self.gate(format!("get {}", key)).await?;
        self.inner.get(key).await
    }

    async fn set(&self, key: CacheKey, value: String, ttl_seconds: u64) -> Result<()> {
        self.gate(format!("set {}", key)).await?;
        self.inner.set(key, value, ttl_seconds).await
    }

    async fn clear(&self, key: CacheKey) -> Result<()> {
        self.gate(format!("clear {}", key)).await?;
        self.inner.clear(key).await
    }
}

// == Index ==

pub struct ScriptedIndex {
    pub inner: MemorySearchIndex,
    journal: Journal,
    pub fail_writes: AtomicBool,
    pub fail_search: AtomicBool,
}

impl ScriptedIndex {
    fn write(&self, op: String) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CatalogError::DerivedStore(format!("{}: index unavailable", op)));
        }
        self.journal.push(format!("index:{}", op));
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for ScriptedIndex {
    async fn index_document(&self, id: &str, fields: SearchFields) -> Result<()> {
        self.write(format!("index {}", id))?;
        self.inner.index_document(id, fields).await
    }

    async fn update_document(&self, id: &str, fields: SearchFields) -> Result<()> {
        self.write(format!("update {}", id))?;
        self.inner.update_document(id, fields).await
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        self.write(format!("delete {}", id))?;
        self.inner.delete_document(id).await
    }

    async fn search(&self, query: &str) -> Result<Vec<String>> {
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(CatalogError::DerivedStore("search: index unavailable".into()));
        }
        self.inner.search(query).await
    }
}

// == Harness ==

pub struct Harness {
    pub catalog: Catalog,
    pub store: Arc<FlakyStore>,
    pub cache: Arc<ScriptedCache>,
    pub index: Arc<ScriptedIndex>,
    pub journal: Journal,
}

pub fn harness() -> Harness {
    let journal = Journal::default();
    let store = Arc::new(FlakyStore {
        inner: MemoryStore::new(),
        journal: journal.clone(),
        fail_writes: AtomicBool::new(false),
        list_gate: Mutex::new(None),
    });
    let cache = Arc::new(ScriptedCache {
        inner: SharedCache::new(),
        journal: journal.clone(),
        fail: AtomicBool::new(false),
        stall: AtomicBool::new(false),
    });
    let index = Arc::new(ScriptedIndex {
        inner: MemorySearchIndex::new(),
        journal: journal.clone(),
        fail_writes: AtomicBool::new(false),
        fail_search: AtomicBool::new(false),
    });

    let catalog = Catalog::new(store.clone(), cache.clone(), index.clone(), TEST_IO_TIMEOUT);

    Harness {
        catalog,
        store,
        cache,
        index,
        journal,
    }
}

impl Harness {
    pub async fn category(&self, name: &str) -> Category {
        self.catalog
            .create_category(CreateCategory {
                name: name.to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn user(&self, name: &str, email: &str) -> User {
        self.catalog
            .create_user(CreateUser {
                name: name.to_string(),
                email: email.to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn product(&self, category_id: &str, name: &str, description: &str) -> Product {
        self.catalog
            .create_product(product_input(category_id, name, description))
            .await
            .unwrap()
    }
}

pub fn product_input(category_id: &str, name: &str, description: &str) -> CreateProduct {
    CreateProduct {
        name: name.to_string(),
        description: description.to_string(),
        value: Decimal::new(4250, 2),
        category_id: category_id.to_string(),
        user_id: None,
    }
}
