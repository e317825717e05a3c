//! Product catalog API wrappers.
//!
//! All product endpoints are public reads. Lookups by id go through the
//! shared `moka` cache; free-text searches always hit the backend because
//! result sets change with inventory.

use reqwest::Method;
use tracing::{debug, instrument};

use avento_core::{Product, ProductId, Review};

use super::{ok_or_api_error, ApiClient, ApiError};
use crate::store::KeyValueStore;

const FETCH_PRODUCTS_ERROR: &str = "Unable to fetch products.";
const FETCH_PRODUCT_ERROR: &str = "Unable to fetch product.";
const FETCH_REVIEWS_ERROR: &str = "Unable to fetch reviews.";

impl<S: KeyValueStore> ApiClient<S> {
    /// Search products by free-text query. An empty query lists the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: Option<&str>) -> Result<Vec<Product>, ApiError> {
        let mut url = self.url("/products")?;
        if let Some(query) = query {
            url.query_pairs_mut().append_pair("query", query);
        }

        let response = self.request(Method::GET, url).send().await?;
        let products = ok_or_api_error(response, FETCH_PRODUCTS_ERROR)
            .await?
            .json()
            .await?;
        Ok(products)
    }

    /// Fetch a batch of products by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids
            .iter()
            .map(ProductId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let mut url = self.url("/products")?;
        url.query_pairs_mut().append_pair("ids", &joined);

        let response = self.request(Method::GET, url).send().await?;
        let products: Vec<Product> = ok_or_api_error(response, FETCH_PRODUCTS_ERROR)
            .await?
            .json()
            .await?;

        for product in &products {
            self.product_cache()
                .insert(product.id.clone(), product.clone())
                .await;
        }
        Ok(products)
    }

    /// Fetch a single product by id, consulting the cache first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    #[instrument(skip(self))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        if let Some(product) = self.product_cache().get(id).await {
            debug!(%id, "product cache hit");
            return Ok(product);
        }

        let url = self.url(&format!("/products/{id}"))?;
        let response = self.request(Method::GET, url).send().await?;
        let product: Product = ok_or_api_error(response, FETCH_PRODUCT_ERROR)
            .await?
            .json()
            .await?;

        self.product_cache()
            .insert(product.id.clone(), product.clone())
            .await;
        Ok(product)
    }

    /// Fetch the reviews behind a product's average rating.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    #[instrument(skip(self))]
    pub async fn product_reviews(&self, id: &ProductId) -> Result<Vec<Review>, ApiError> {
        let url = self.url(&format!("/products/{id}/reviews"))?;
        let response = self.request(Method::GET, url).send().await?;
        let reviews = ok_or_api_error(response, FETCH_REVIEWS_ERROR)
            .await?
            .json()
            .await?;
        Ok(reviews)
    }
}
