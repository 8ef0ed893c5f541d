//! Request DTOs for the catalog API
//!
//! Field constraints are checked here, at the HTTP seam, before the
//! catalog core is invoked. Each `validate` returns an error message if
//! validation fails, None if valid.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Option<String> {
    let len = value.chars().count();
    if len < min || len > max {
        return Some(format!(
            "{} must be between {} and {} characters",
            field, min, max
        ));
    }
    None
}

fn check_email(email: &str) -> Option<String> {
    if EMAIL_PATTERN.is_match(email) {
        None
    } else {
        Some(format!("'{}' is not a valid email address", email))
    }
}

fn check_positive(value: &Decimal) -> Option<String> {
    if value.is_sign_positive() && !value.is_zero() {
        None
    } else {
        Some("value must be a positive number".to_string())
    }
}

/// Request body for POST /categories
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    pub name: String,
}

impl CreateCategory {
    pub fn validate(&self) -> Option<String> {
        check_length("name", &self.name, 3, 50)
    }
}

/// Request body for PATCH /categories/:id
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    #[serde(default)]
    pub name: Option<String>,
}

impl UpdateCategory {
    pub fn validate(&self) -> Option<String> {
        self.name
            .as_deref()
            .and_then(|name| check_length("name", name, 3, 50))
    }
}

/// Request body for POST /products
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub value: Decimal,
    pub category_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl CreateProduct {
    pub fn validate(&self) -> Option<String> {
        check_length("name", &self.name, 3, 100)
            .or_else(|| check_length("description", &self.description, 5, 200))
            .or_else(|| check_positive(&self.value))
    }
}

/// Request body for PATCH /products/:id
///
/// Only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub value: Option<Decimal>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl UpdateProduct {
    pub fn validate(&self) -> Option<String> {
        self.name
            .as_deref()
            .and_then(|name| check_length("name", name, 3, 100))
            .or_else(|| {
                self.description
                    .as_deref()
                    .and_then(|d| check_length("description", d, 5, 200))
            })
            .or_else(|| self.value.as_ref().and_then(check_positive))
    }

    /// True when the patch changes a field mirrored by the search index.
    pub fn touches_search_fields(&self) -> bool {
        self.name.is_some() || self.description.is_some()
    }
}

/// Request body for POST /users
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

impl CreateUser {
    pub fn validate(&self) -> Option<String> {
        check_length("name", &self.name, 5, 50).or_else(|| check_email(&self.email))
    }
}

/// Request body for PATCH /users/:id
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UpdateUser {
    pub fn validate(&self) -> Option<String> {
        self.name
            .as_deref()
            .and_then(|name| check_length("name", name, 5, 50))
            .or_else(|| self.email.as_deref().and_then(check_email))
    }
}

/// Query string for GET /products/search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}
