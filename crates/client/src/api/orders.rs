//! Order API wrappers.

use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use avento_core::{CheckoutItem, DeliveryDetails, Order};

use super::payments::{CheckoutSession, CheckoutSessionResponse};
use super::{ok_or_api_error, ApiClient, ApiError};
use crate::store::KeyValueStore;

const FETCH_ORDERS_ERROR: &str = "Unable to fetch orders.";
const CREATE_ORDER_ERROR: &str = "Unable to create order and start payment.";

#[derive(Debug, Serialize)]
struct OrderWithPaymentPayload<'a> {
    items: &'a [CheckoutItem],
    name: &'a str,
    address: &'a str,
}

impl<S: KeyValueStore> ApiClient<S> {
    /// Fetch the authenticated user's orders.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    #[instrument(skip(self))]
    pub async fn fetch_orders(&self) -> Result<Vec<Order>, ApiError> {
        let url = self.url("/orders")?;
        let response = self.authed(Method::GET, url).send().await?;
        let orders = ok_or_api_error(response, FETCH_ORDERS_ERROR)
            .await?
            .json()
            .await?;
        Ok(orders)
    }

    /// Create an order and open its payment session in one call.
    #[instrument(skip(self, items, delivery), fields(lines = items.len()))]
    pub(crate) async fn create_order_with_payment_request(
        &self,
        items: &[CheckoutItem],
        delivery: &DeliveryDetails,
    ) -> Result<CheckoutSession, ApiError> {
        let url = self.url("/orders")?;
        let response = self
            .authed(Method::POST, url)
            .json(&OrderWithPaymentPayload {
                items,
                name: &delivery.name,
                address: &delivery.address,
            })
            .send()
            .await?;

        let session: CheckoutSessionResponse = ok_or_api_error(response, CREATE_ORDER_ERROR)
            .await?
            .json()
            .await?;
        session.into_session()
    }
}
