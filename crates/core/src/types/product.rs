//! Product catalog types.
//!
//! Products are read-only from the client's perspective: they are fetched by
//! free-text query or by id batch and never mutated through this client.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::price::CurrencyCode;

/// A purchasable product as returned by the catalog API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    pub price: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub inventory: u32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// Free-form attribute bag (size charts, materials, ...). Shape is owned
    /// by the catalog, so it stays untyped here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Value>,
    /// Mean review rating, 0 when unreviewed.
    #[serde(default)]
    pub average_review: f64,
    /// Number of reviews behind `average_review`.
    #[serde(default)]
    pub reviews: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether the product can currently be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.inventory > 0
    }
}

/// A single customer review for a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": "p1",
            "name": "Canvas Tote",
            "price": "24.50",
            "currency": "USD",
            "inventory": 3,
            "category": "bags",
            "images": ["https://cdn.example.com/tote.jpg"],
            "average_review": 4.5,
            "reviews": 12
        }"#
    }

    #[test]
    fn test_deserialize_with_missing_optionals() {
        let product: Product = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(product.id, ProductId::new("p1"));
        assert_eq!(product.price, Decimal::new(2450, 2));
        assert!(product.description.is_empty());
        assert!(product.attributes.is_none());
        assert!(product.in_stock());
    }

    #[test]
    fn test_out_of_stock() {
        let mut product: Product = serde_json::from_str(sample_json()).unwrap();
        product.inventory = 0;
        assert!(!product.in_stock());
    }
}
