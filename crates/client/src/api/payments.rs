//! Payment and checkout-session API wrappers.
//!
//! A checkout session is a server-issued redirect target for completing
//! payment externally. The cart is never cleared by session creation; only
//! the return URL parameter signals completion.

use std::future::Future;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use avento_core::{CheckoutItem, DeliveryDetails, OrderId};

use super::{ok_or_api_error, ApiClient, ApiError};
use crate::store::KeyValueStore;

const CHECKOUT_SESSION_ERROR: &str = "Unable to create checkout session.";

/// A server-issued checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    /// Redirect target for completing payment, when the backend issued one.
    pub url: Option<Url>,
    /// The order created alongside the session, when checkout went through
    /// the orders route.
    pub order_id: Option<OrderId>,
}

/// Checkout operations, as consumed by the cart state container.
pub trait CheckoutApi: Send + Sync {
    /// Open a bare checkout session for a set of items.
    fn create_checkout_session(
        &self,
        items: &[CheckoutItem],
    ) -> impl Future<Output = Result<CheckoutSession, ApiError>> + Send;

    /// Create an order with delivery details and open its payment session.
    fn create_order_with_payment(
        &self,
        items: &[CheckoutItem],
        delivery: &DeliveryDetails,
    ) -> impl Future<Output = Result<CheckoutSession, ApiError>> + Send;
}

#[derive(Debug, Serialize)]
struct CheckoutSessionPayload<'a> {
    items: &'a [CheckoutItem],
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckoutSessionResponse {
    url: Option<String>,
    order_id: Option<OrderId>,
}

impl CheckoutSessionResponse {
    pub(crate) fn into_session(self) -> Result<CheckoutSession, ApiError> {
        let url = self.url.as_deref().map(Url::parse).transpose()?;
        Ok(CheckoutSession {
            url,
            order_id: self.order_id,
        })
    }
}

impl<S: KeyValueStore> CheckoutApi for ApiClient<S> {
    #[instrument(skip(self, items), fields(lines = items.len()))]
    async fn create_checkout_session(
        &self,
        items: &[CheckoutItem],
    ) -> Result<CheckoutSession, ApiError> {
        let url = self.url("/payments/create-checkout-session")?;
        let response = self
            .request(Method::POST, url)
            .json(&CheckoutSessionPayload { items })
            .send()
            .await?;

        let session: CheckoutSessionResponse = ok_or_api_error(response, CHECKOUT_SESSION_ERROR)
            .await?
            .json()
            .await?;
        session.into_session()
    }

    async fn create_order_with_payment(
        &self,
        items: &[CheckoutItem],
        delivery: &DeliveryDetails,
    ) -> Result<CheckoutSession, ApiError> {
        self.create_order_with_payment_request(items, delivery)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_response_with_url() {
        let response: CheckoutSessionResponse =
            serde_json::from_str(r#"{"url":"https://pay.example.com/cs_123"}"#).unwrap();
        let session = response.into_session().unwrap();
        assert_eq!(
            session.url.unwrap().as_str(),
            "https://pay.example.com/cs_123"
        );
        assert!(session.order_id.is_none());
    }

    #[test]
    fn test_response_without_url() {
        let response: CheckoutSessionResponse = serde_json::from_str("{}").unwrap();
        let session = response.into_session().unwrap();
        assert!(session.url.is_none());
    }

    #[test]
    fn test_response_with_invalid_url_is_an_error() {
        let response: CheckoutSessionResponse =
            serde_json::from_str(r#"{"url":"not a url"}"#).unwrap();
        assert!(response.into_session().is_err());
    }
}
