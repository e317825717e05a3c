//! Orders and checkout payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::cart::CartItem;
use crate::types::id::{OrderId, ProductId};
use crate::types::price::CurrencyCode;

/// An order as returned by the orders API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub product_ids: Vec<ProductId>,
    pub name: String,
    pub address: String,
}

/// One line of a checkout-session request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub product_name: String,
    /// Unit amount in the currency's standard unit, serialized as a number.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub quantity: u32,
    pub currency: CurrencyCode,
}

impl From<&CartItem> for CheckoutItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.id.clone(),
            product_name: item.name.clone(),
            amount: item.price,
            quantity: item.quantity,
            currency: item.currency,
        }
    }
}

/// Delivery details collected before checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDetails {
    pub name: String,
    pub address: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_item_from_cart_item() {
        let item = CartItem {
            id: ProductId::new("p1"),
            name: "Canvas Tote".to_owned(),
            price: Decimal::new(2450, 2),
            currency: CurrencyCode::USD,
            quantity: 2,
            images: Vec::new(),
        };
        let line = CheckoutItem::from(&item);
        assert_eq!(line.product_id, ProductId::new("p1"));
        assert_eq!(line.quantity, 2);
        assert_eq!(line.amount, Decimal::new(2450, 2));
    }

    #[test]
    fn test_checkout_amount_serializes_as_number() {
        let line = CheckoutItem {
            product_id: ProductId::new("p1"),
            product_name: "Canvas Tote".to_owned(),
            amount: Decimal::new(1050, 2),
            quantity: 1,
            currency: CurrencyCode::USD,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert!(json["amount"].is_number());
    }
}
