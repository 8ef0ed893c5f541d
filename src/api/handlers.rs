//! API Handlers
//!
//! HTTP request handlers for each catalog operation. Inputs are validated
//! here, before the catalog is invoked.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::cache::SharedCache;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::models::{
    Category, CategoryDetail, CategoryListing, CreateCategory, CreateProduct, CreateUser,
    DeleteResponse, HealthResponse, Product, SearchQuery, StatsResponse, UpdateCategory,
    UpdateProduct, UpdateUser, User,
};
use crate::search::MemorySearchIndex;
use crate::store::MemoryStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The consistency orchestrator
    pub catalog: Arc<Catalog>,
    /// The list cache, kept for stats and the cleanup task
    pub cache: SharedCache,
}

impl AppState {
    pub fn new(catalog: Catalog, cache: SharedCache) -> Self {
        Self {
            catalog: Arc::new(catalog),
            cache,
        }
    }

    /// Builds in-process stores and wires them into a catalog.
    pub fn in_memory(io_timeout: Duration) -> Self {
        let cache = SharedCache::new();
        let catalog = Catalog::new(
            Arc::new(MemoryStore::new()),
            Arc::new(cache.clone()),
            Arc::new(MemorySearchIndex::new()),
            io_timeout,
        );
        Self::new(catalog, cache)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::in_memory(config.io_timeout())
    }
}

fn check(problem: Option<String>) -> Result<()> {
    match problem {
        Some(message) => Err(CatalogError::Validation(message)),
        None => Ok(()),
    }
}

// == Categories ==

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryListing>>> {
    Ok(Json(state.catalog.get_categories().await?))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CategoryDetail>> {
    Ok(Json(state.catalog.get_category(&id).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategory>,
) -> Result<(StatusCode, Json<Category>)> {
    check(req.validate())?;
    let category = state.catalog.create_category(req).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCategory>,
) -> Result<Json<Category>> {
    check(req.validate())?;
    Ok(Json(state.catalog.update_category(&id, req).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.catalog.delete_category(&id).await?;
    Ok(Json(DeleteResponse::new(deleted)))
}

// == Products ==

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog.get_products().await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    Ok(Json(state.catalog.get_product(&id).await?))
}

pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog.search_products(&query.q).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    check(req.validate())?;
    let product = state.catalog.create_product(req).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProduct>,
) -> Result<Json<Product>> {
    check(req.validate())?;
    Ok(Json(state.catalog.update_product(&id, req).await?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.catalog.delete_product(&id).await?;
    Ok(Json(DeleteResponse::new(deleted)))
}

// == Users ==

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.catalog.get_users().await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    Ok(Json(state.catalog.get_user(&id).await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUser>,
) -> Result<(StatusCode, Json<User>)> {
    check(req.validate())?;
    let user = state.catalog.create_user(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUser>,
) -> Result<Json<User>> {
    check(req.validate())?;
    Ok(Json(state.catalog.update_user(&id, req).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.catalog.delete_user(&id).await?;
    Ok(Json(DeleteResponse::new(deleted)))
}

// == Operations ==

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.stats().await;
    Json(StatsResponse::new(cache, state.catalog.staleness()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
