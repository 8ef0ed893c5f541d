//! User entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::product::ProductWithoutUser;

/// A user with the products associated to it.
///
/// `products` is derived by reverse lookup on `Product::user_id`; it is not
/// stored on the user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub products: Vec<ProductWithoutUser>,
}
