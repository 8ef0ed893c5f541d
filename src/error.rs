//! Error types for the catalog service
//!
//! Provides unified error handling using thiserror.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Entity Kind ==
/// The three entity kinds held by the primary store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Category,
    Product,
    User,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Category => "Category",
            EntityKind::Product => "Product",
            EntityKind::User => "User",
        };
        f.write_str(name)
    }
}

// == Catalog Error Enum ==
/// Unified error type for the catalog service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Referenced entity is absent
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness or restrict constraint violated
    #[error("{0}")]
    Conflict(String),

    /// Field constraints violated (raised at the API seam)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Primary store I/O failure
    #[error("Store failure: {0}")]
    Store(String),

    /// Cache or search index I/O failure
    #[error("Derived store failure: {0}")]
    DerivedStore(String),

    /// Internal error (serialization faults and the like)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// `"<Kind> with id '<id>' not found"`
    pub fn not_found(kind: EntityKind, id: &str) -> Self {
        CatalogError::NotFound(format!("{} with id '{}' not found", kind, id))
    }

    /// `"Email '<email>' not available"`
    pub fn email_taken(email: &str) -> Self {
        CatalogError::Conflict(format!("Email '{}' not available", email))
    }

    /// True for failures of the cache or the search index.
    pub fn is_derived(&self) -> bool {
        matches!(self, CatalogError::DerivedStore(_))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Conflict(_) => StatusCode::CONFLICT,
            CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::DerivedStore(_) => StatusCode::SERVICE_UNAVAILABLE,
            CatalogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Internal(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the catalog service.
pub type Result<T> = std::result::Result<T, CatalogError>;
