//! Unified error type for container operations.
//!
//! API wrappers and the persistence adapter each have their own error enums;
//! state containers surface both behind this single type. Variants wrapping a
//! source are `transparent` so the backend's `error` message reaches the user
//! verbatim.

use thiserror::Error;

use avento_core::EmailError;

use crate::api::geocode::GeocodeError;
use crate::api::ApiError;
use crate::store::StoreError;

/// Errors surfaced by state container operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Backend API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Local persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Address lookup failed.
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    /// Email failed client-side validation.
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    /// Checkout was requested for an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// The checkout session came back without a redirect URL.
    #[error("checkout session did not include a redirect URL")]
    MissingRedirectUrl,
}
