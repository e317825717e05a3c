//! Saved product lists ("wishlists").
//!
//! Lists are owned by the backend; the client only ever holds a cached copy
//! and replaces it wholesale with the server's response after each mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{ListId, ProductId};

/// Name of the distinguished default list.
///
/// The backend refuses to create, rename, or delete a list with this name;
/// the client UI mirrors that restriction before issuing the call.
pub const WISHLIST_NAME: &str = "Wishlist";

/// A named, server-persisted collection of product references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub name: String,
    #[serde(default)]
    pub product_ids: Vec<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl List {
    /// Whether this is the distinguished default list.
    #[must_use]
    pub fn is_wishlist(&self) -> bool {
        self.name == WISHLIST_NAME
    }

    /// Whether the list references the given product.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.product_ids.contains(product_id)
    }
}
