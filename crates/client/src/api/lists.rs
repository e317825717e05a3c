//! Saved-list API wrappers.
//!
//! Every mutation returns the server's authoritative copy of the affected
//! list; the lists container replaces its cached copy with that response
//! rather than applying the change locally.

use std::future::Future;

use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use avento_core::{List, ListId, ProductId};

use super::{ok_or_api_error, ApiClient, ApiError};
use crate::store::KeyValueStore;

const FETCH_LISTS_ERROR: &str = "Unable to fetch lists.";
const CREATE_LIST_ERROR: &str = "Unable to create list.";
const UPDATE_LIST_ERROR: &str = "Unable to update list.";
const ADD_PRODUCT_ERROR: &str = "Unable to add product to list.";
const REMOVE_PRODUCT_ERROR: &str = "Unable to remove product from list.";
const DELETE_LIST_ERROR: &str = "Unable to delete list.";

/// List operations, as consumed by the lists state container.
pub trait ListsApi: Send + Sync {
    /// Fetch all lists owned by the authenticated user.
    fn fetch_lists(&self) -> impl Future<Output = Result<Vec<List>, ApiError>> + Send;

    /// Create a named list.
    fn create_list(&self, name: &str) -> impl Future<Output = Result<List, ApiError>> + Send;

    /// Rename a list.
    fn update_list(
        &self,
        id: &ListId,
        name: &str,
    ) -> impl Future<Output = Result<List, ApiError>> + Send;

    /// Add a product reference to a list.
    fn add_product_to_list(
        &self,
        list_id: &ListId,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<List, ApiError>> + Send;

    /// Remove a product reference from a list.
    fn remove_product_from_list(
        &self,
        list_id: &ListId,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<List, ApiError>> + Send;

    /// Delete a list outright.
    fn delete_list(&self, id: &ListId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

#[derive(Debug, Serialize)]
struct ListNamePayload<'a> {
    name: &'a str,
}

impl<S: KeyValueStore> ListsApi for ApiClient<S> {
    #[instrument(skip(self))]
    async fn fetch_lists(&self) -> Result<Vec<List>, ApiError> {
        let url = self.url("/lists")?;
        let response = self.authed(Method::GET, url).send().await?;
        let lists = ok_or_api_error(response, FETCH_LISTS_ERROR)
            .await?
            .json()
            .await?;
        Ok(lists)
    }

    #[instrument(skip(self))]
    async fn create_list(&self, name: &str) -> Result<List, ApiError> {
        let url = self.url("/lists")?;
        let response = self
            .authed(Method::POST, url)
            .json(&ListNamePayload { name })
            .send()
            .await?;
        let list = ok_or_api_error(response, CREATE_LIST_ERROR)
            .await?
            .json()
            .await?;
        Ok(list)
    }

    #[instrument(skip(self))]
    async fn update_list(&self, id: &ListId, name: &str) -> Result<List, ApiError> {
        let url = self.url(&format!("/lists/{id}"))?;
        let response = self
            .authed(Method::PUT, url)
            .json(&ListNamePayload { name })
            .send()
            .await?;
        let list = ok_or_api_error(response, UPDATE_LIST_ERROR)
            .await?
            .json()
            .await?;
        Ok(list)
    }

    #[instrument(skip(self))]
    async fn add_product_to_list(
        &self,
        list_id: &ListId,
        product_id: &ProductId,
    ) -> Result<List, ApiError> {
        let url = self.url(&format!("/lists/{list_id}/product/{product_id}"))?;
        let response = self.authed(Method::POST, url).send().await?;
        let list = ok_or_api_error(response, ADD_PRODUCT_ERROR)
            .await?
            .json()
            .await?;
        Ok(list)
    }

    #[instrument(skip(self))]
    async fn remove_product_from_list(
        &self,
        list_id: &ListId,
        product_id: &ProductId,
    ) -> Result<List, ApiError> {
        let url = self.url(&format!("/lists/{list_id}/product/{product_id}"))?;
        let response = self.authed(Method::DELETE, url).send().await?;
        let list = ok_or_api_error(response, REMOVE_PRODUCT_ERROR)
            .await?
            .json()
            .await?;
        Ok(list)
    }

    #[instrument(skip(self))]
    async fn delete_list(&self, id: &ListId) -> Result<(), ApiError> {
        let url = self.url(&format!("/lists/{id}"))?;
        let response = self.authed(Method::DELETE, url).send().await?;
        ok_or_api_error(response, DELETE_LIST_ERROR).await?;
        Ok(())
    }
}
