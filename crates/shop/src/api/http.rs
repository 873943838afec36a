//! `reqwest`-backed implementation of the storefront REST API.

use lumira_core::{ProductId, ProductSummary};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Response;

use crate::api::types::{
    CartEnvelope, CartItemCreate, CartItemPayload, CartItemUpdate, CartSyncEntry,
    WishlistEnvelope, WishlistItemPayload,
};
use crate::api::{ApiError, CartApi, WishlistApi};
use crate::config::ShopConfig;
use crate::session::AccessToken;

/// HTTP client for the storefront backend.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Create a new API client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ShopConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Map a non-success response to `ApiError::Api` with the body as the
    /// message.
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Fetch a single product by ID (public catalog endpoint, no auth).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the product does not exist.
    pub async fn fetch_product(&self, product_id: ProductId) -> Result<ProductSummary, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/products/{product_id}")))
            .send()
            .await?;
        Self::parse(Self::check(response).await?).await
    }
}

impl CartApi for HttpApi {
    async fn fetch_cart(&self, token: &AccessToken) -> Result<CartEnvelope, ApiError> {
        let response = self
            .client
            .get(self.url("/cart"))
            .bearer_auth(token.expose())
            .send()
            .await?;
        Self::parse(Self::check(response).await?).await
    }

    async fn create_cart_item(
        &self,
        token: &AccessToken,
        item: &CartItemCreate,
    ) -> Result<CartItemPayload, ApiError> {
        let response = self
            .client
            .post(self.url("/cart/items"))
            .bearer_auth(token.expose())
            .json(item)
            .send()
            .await?;
        Self::parse(Self::check(response).await?).await
    }

    async fn update_cart_item(
        &self,
        token: &AccessToken,
        product_id: ProductId,
        update: &CartItemUpdate,
    ) -> Result<CartItemPayload, ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/cart/items/{product_id}")))
            .bearer_auth(token.expose())
            .json(update)
            .send()
            .await?;
        Self::parse(Self::check(response).await?).await
    }

    async fn delete_cart_item(
        &self,
        token: &AccessToken,
        product_id: ProductId,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/cart/items/{product_id}")))
            .bearer_auth(token.expose())
            .send()
            .await?;
        Self::check(response).await.map(drop)
    }

    async fn clear_cart(&self, token: &AccessToken) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url("/cart"))
            .bearer_auth(token.expose())
            .send()
            .await?;
        Self::check(response).await.map(drop)
    }

    async fn sync_cart(
        &self,
        token: &AccessToken,
        items: &[CartSyncEntry],
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/cart/sync"))
            .bearer_auth(token.expose())
            .json(items)
            .send()
            .await?;
        Self::check(response).await.map(drop)
    }
}

impl WishlistApi for HttpApi {
    async fn fetch_wishlist(&self, token: &AccessToken) -> Result<WishlistEnvelope, ApiError> {
        let response = self
            .client
            .get(self.url("/wishlist"))
            .bearer_auth(token.expose())
            .send()
            .await?;
        Self::parse(Self::check(response).await?).await
    }

    async fn create_wishlist_item(
        &self,
        token: &AccessToken,
        product_id: ProductId,
    ) -> Result<WishlistItemPayload, ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/wishlist/items/{product_id}")))
            .bearer_auth(token.expose())
            .send()
            .await?;
        Self::parse(Self::check(response).await?).await
    }

    async fn delete_wishlist_item(
        &self,
        token: &AccessToken,
        product_id: ProductId,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/wishlist/items/{product_id}")))
            .bearer_auth(token.expose())
            .send()
            .await?;
        Self::check(response).await.map(drop)
    }

    async fn clear_wishlist(&self, token: &AccessToken) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url("/wishlist"))
            .bearer_auth(token.expose())
            .send()
            .await?;
        Self::check(response).await.map(drop)
    }

    async fn sync_wishlist(
        &self,
        token: &AccessToken,
        product_ids: &[ProductId],
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/wishlist/sync"))
            .bearer_auth(token.expose())
            .json(product_ids)
            .send()
            .await?;
        Self::check(response).await.map(drop)
    }
}
