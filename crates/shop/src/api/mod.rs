//! Remote collection store: wire schemas, errors, and the API seam.
//!
//! The controllers talk to the backend exclusively through the [`CartApi`]
//! and [`WishlistApi`] traits. Production uses the `reqwest`-backed
//! [`HttpApi`]; tests script in-memory implementations with failure
//! injection.

mod http;
pub mod types;

pub use http::HttpApi;
pub use types::*;

use lumira_core::ProductId;
use thiserror::Error;

use crate::session::AccessToken;

/// Errors that can occur when calling the storefront backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected schema.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// The HTTP status code, when the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(error) => error.status().map(|s| s.as_u16()),
            Self::Parse(_) => None,
        }
    }

    /// Whether this is a 409 conflict. A conflict on wishlist add means the
    /// entry already exists and is treated as success by the caller.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

/// Remote cart store, one account-scoped list of `{product, quantity}`
/// entries keyed by product.
#[allow(async_fn_in_trait)]
pub trait CartApi {
    /// `GET /cart`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    async fn fetch_cart(&self, token: &AccessToken) -> Result<CartEnvelope, ApiError>;

    /// `POST /cart/items`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn create_cart_item(
        &self,
        token: &AccessToken,
        item: &CartItemCreate,
    ) -> Result<CartItemPayload, ApiError>;

    /// `PUT /cart/items/{product_id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn update_cart_item(
        &self,
        token: &AccessToken,
        product_id: ProductId,
        update: &CartItemUpdate,
    ) -> Result<CartItemPayload, ApiError>;

    /// `DELETE /cart/items/{product_id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn delete_cart_item(
        &self,
        token: &AccessToken,
        product_id: ProductId,
    ) -> Result<(), ApiError>;

    /// `DELETE /cart`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn clear_cart(&self, token: &AccessToken) -> Result<(), ApiError>;

    /// `POST /cart/sync` - idempotent batch merge of local entries into the
    /// remote cart (max-quantity upsert per product).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn sync_cart(&self, token: &AccessToken, items: &[CartSyncEntry])
    -> Result<(), ApiError>;
}

/// Remote wishlist store, one account-scoped set of products.
#[allow(async_fn_in_trait)]
pub trait WishlistApi {
    /// `GET /wishlist`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    async fn fetch_wishlist(&self, token: &AccessToken) -> Result<WishlistEnvelope, ApiError>;

    /// `POST /wishlist/items/{product_id}` - 409 when already present.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, including the 409 conflict the
    /// caller maps to success.
    async fn create_wishlist_item(
        &self,
        token: &AccessToken,
        product_id: ProductId,
    ) -> Result<WishlistItemPayload, ApiError>;

    /// `DELETE /wishlist/items/{product_id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn delete_wishlist_item(
        &self,
        token: &AccessToken,
        product_id: ProductId,
    ) -> Result<(), ApiError>;

    /// `DELETE /wishlist`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn clear_wishlist(&self, token: &AccessToken) -> Result<(), ApiError>;

    /// `POST /wishlist/sync` - idempotent set-union merge of local product
    /// IDs into the remote wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn sync_wishlist(
        &self,
        token: &AccessToken,
        product_ids: &[ProductId],
    ) -> Result<(), ApiError>;
}
