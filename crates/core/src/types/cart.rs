//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::price::CurrencyCode;
use crate::types::product::Product;

/// A single line in the local cart.
///
/// Identity key is the product id: a cart never holds two lines for the same
/// product. Quantity is at least 1 while the line exists; a line whose
/// quantity would drop to 0 is removed instead of stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    pub quantity: u32,
    #[serde(default)]
    pub images: Vec<String>,
}

impl CartItem {
    /// Build a cart line from a catalog product.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            currency: product.currency,
            quantity,
            images: product.images.clone(),
        }
    }

    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}
