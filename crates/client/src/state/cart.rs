//! Cart state container.
//!
//! The cart is fully local: mutations apply in memory first and persist
//! after every change. Checkout hands the cart's lines to the payments API
//! and navigates to the returned redirect URL; the cart itself is cleared
//! only when the external payment flow signals completion through the
//! return URL parameter, never by the checkout call itself.

use std::sync::{Mutex, PoisonError};

use rust_decimal::Decimal;
use tracing::instrument;
use url::Url;

use avento_core::{CartItem, CheckoutItem, DeliveryDetails, ProductId};

use crate::api::CheckoutApi;
use crate::error::ClientError;
use crate::state::Navigator;
use crate::store::{KeyValueStore, CART_KEY};
use crate::toast::{ToastRequest, Toasts};

/// Query parameter set by the payment provider's success redirect.
const CHECKOUT_COMPLETE_PARAM: &str = "checkout_complete";

/// Local cart state container.
pub struct Cart<S, P, N>
where
    S: KeyValueStore,
    P: CheckoutApi,
    N: Navigator,
{
    store: S,
    payments: P,
    navigator: N,
    toasts: Toasts,
    items: Mutex<Vec<CartItem>>,
    last_error: Mutex<Option<String>>,
}

impl<S, P, N> Cart<S, P, N>
where
    S: KeyValueStore,
    P: CheckoutApi,
    N: Navigator,
{
    /// Create a cart hydrated from the persistence adapter.
    pub fn new(store: S, payments: P, navigator: N, toasts: Toasts) -> Self {
        let items = store.load(CART_KEY).unwrap_or_default();
        Self {
            store,
            payments,
            navigator,
            toasts,
            items: Mutex::new(items),
            last_error: Mutex::new(None),
        }
    }

    /// Current cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.lock_items().clone()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lock_items().iter().map(|item| item.quantity).sum()
    }

    /// Sum of price times quantity across all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lock_items().iter().map(CartItem::line_total).sum()
    }

    /// Add an item, merging by product id.
    ///
    /// If the product is already in the cart its quantity grows by the new
    /// item's quantity; otherwise the item is appended.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Store`] if persisting the cart fails.
    pub fn add_item(&self, item: CartItem) -> Result<(), ClientError> {
        let name = item.name.clone();
        {
            let mut items = self.lock_items();
            match items.iter().position(|line| line.id == item.id) {
                Some(index) => {
                    if let Some(line) = items.get_mut(index) {
                        line.quantity += item.quantity;
                    }
                }
                None => items.push(item),
            }
            self.persist(&items)?;
        }

        self.toasts
            .push(ToastRequest::new("Item added", format!("{name} added to cart.")));
        Ok(())
    }

    /// Remove a line by product id. Absent ids are a safe no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Store`] if persisting the cart fails.
    pub fn remove_item(&self, id: &ProductId) -> Result<(), ClientError> {
        let removed_name = {
            let mut items = self.lock_items();
            let removed_name = items
                .iter()
                .find(|item| &item.id == id)
                .map(|item| item.name.clone());
            if removed_name.is_none() {
                return Ok(());
            }
            items.retain(|item| &item.id != id);
            self.persist(&items)?;
            removed_name
        };

        if let Some(name) = removed_name {
            self.toasts.push(ToastRequest::new(
                "Item removed",
                format!("{name} removed from cart."),
            ));
        }
        Ok(())
    }

    /// Set a line's quantity directly. Absent ids are a safe no-op.
    ///
    /// Quantity policy (0 removes, upper bound rejected) belongs to callers;
    /// the container stores whatever it is given.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Store`] if persisting the cart fails.
    pub fn update_quantity(&self, id: &ProductId, quantity: u32) -> Result<(), ClientError> {
        let mut items = self.lock_items();
        let Some(item) = items.iter_mut().find(|item| &item.id == id) else {
            return Ok(());
        };
        item.quantity = quantity;
        self.persist(&items)
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Store`] if persisting the cart fails.
    pub fn clear(&self) -> Result<(), ClientError> {
        {
            let mut items = self.lock_items();
            items.clear();
            self.persist(&items)?;
        }

        self.toasts.push(ToastRequest::new(
            "Cart cleared",
            "All items have been removed from the cart.",
        ));
        Ok(())
    }

    /// Start the external checkout flow for the current cart.
    ///
    /// With delivery details the backend creates an order and its payment
    /// session in one call; without them a bare checkout session is opened.
    /// On success the redirect URL is handed to the navigator and returned.
    /// The cart is not mutated either way - completion is signalled later
    /// through [`Cart::handle_return`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::EmptyCart`] for an empty cart,
    /// [`ClientError::MissingRedirectUrl`] when the session has no URL, and
    /// [`ClientError::Api`] when the backend rejects the request.
    #[instrument(skip(self, delivery))]
    pub async fn checkout(
        &self,
        delivery: Option<&DeliveryDetails>,
    ) -> Result<Url, ClientError> {
        let items = self.items();
        if items.is_empty() {
            return Err(self.record(ClientError::EmptyCart));
        }

        let lines: Vec<CheckoutItem> = items.iter().map(CheckoutItem::from).collect();
        let session = match delivery {
            Some(delivery) => self.payments.create_order_with_payment(&lines, delivery).await,
            None => self.payments.create_checkout_session(&lines).await,
        };

        let session = match session {
            Ok(session) => session,
            Err(error) => {
                let error = self.record(ClientError::from(error));
                self.toasts
                    .push(ToastRequest::destructive("Checkout error", error.to_string()));
                return Err(error);
            }
        };

        let Some(url) = session.url else {
            let error = self.record(ClientError::MissingRedirectUrl);
            self.toasts
                .push(ToastRequest::destructive("Checkout error", error.to_string()));
            return Err(error);
        };

        self.navigator.navigate(&url);
        Ok(url)
    }

    /// Process the payment provider's return URL.
    ///
    /// Clears the cart (and returns `true`) only when the URL carries
    /// `checkout_complete=true`; any other return leaves the cart intact.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Store`] if clearing the cart fails to persist.
    pub fn handle_return(&self, url: &Url) -> Result<bool, ClientError> {
        let completed = url
            .query_pairs()
            .any(|(key, value)| key == CHECKOUT_COMPLETE_PARAM && value == "true");
        if !completed {
            return Ok(false);
        }
        self.clear()?;
        Ok(true)
    }

    /// The message of the most recent failure, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget the recorded failure.
    pub fn clear_error(&self) {
        *self
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn lock_items(&self) -> std::sync::MutexGuard<'_, Vec<CartItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, items: &[CartItem]) -> Result<(), ClientError> {
        self.store
            .save(CART_KEY, items)
            .map_err(|error| self.record(ClientError::from(error)))
    }

    fn record(&self, error: ClientError) -> ClientError {
        *self
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error.to_string());
        error
    }
}
