//! Avento Core - Shared types library.
//!
//! This crate provides common types used across all Avento components:
//! - `client` - State containers, API wrappers, and local persistence
//! - `cli` - Command-line storefront front-end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, and the storefront domain model
//!   (products, carts, lists, users, settings, orders)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
