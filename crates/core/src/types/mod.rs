//! Core types for Avento.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod list;
pub mod order;
pub mod price;
pub mod product;
pub mod settings;
pub mod user;

pub use cart::CartItem;
pub use email::{Email, EmailError};
pub use id::*;
pub use list::{List, WISHLIST_NAME};
pub use order::{CheckoutItem, DeliveryDetails, Order};
pub use price::{CurrencyCode, Price};
pub use product::{Product, Review};
pub use settings::{Setting, UserSettings};
pub use user::{AuthSession, User};
