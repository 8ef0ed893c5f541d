//! Category entity and its views

use serde::{Deserialize, Serialize};

use super::product::{OwnedProduct, ProductSummary};

/// A product category. Owns products by reference through `Product::category_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// A single category with its products and their owners loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    pub id: String,
    pub name: String,
    pub products: Vec<OwnedProduct>,
}

/// A category in the list view, with bare product columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListing {
    pub id: String,
    pub name: String,
    pub products: Vec<ProductSummary>,
}

impl From<&CategoryDetail> for Category {
    fn from(detail: &CategoryDetail) -> Self {
        Self {
            id: detail.id.clone(),
            name: detail.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_listing_serializes_products() {
        let listing = CategoryListing {
            id: "c1".to_string(),
            name: "Lighting".to_string(),
            products: Vec::new(),
        };

        let json = serde_json::to_value(listing).unwrap();
        assert_eq!(json["name"], "Lighting");
        assert!(json["products"].as_array().unwrap().is_empty());
    }
}
