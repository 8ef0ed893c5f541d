//! Catalog Sync - categories, products and users over a primary store
//!
//! Keeps a read-through list cache and a product search index coherent with
//! the primary store as entities are created, updated and deleted.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod store;
pub mod tasks;
pub mod timeouts;
pub mod validator;

pub use api::AppState;
pub use catalog::Catalog;
pub use config::Config;
pub use error::{CatalogError, Result};
pub use tasks::spawn_cleanup_task;
