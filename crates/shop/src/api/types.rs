//! Wire schemas for the storefront REST backend.
//!
//! Every endpoint the reconciliation layer consumes has an explicit schema
//! here, validated at the boundary before anything reaches a controller.
//! Field names and shapes mirror the backend's JSON exactly.

use chrono::{DateTime, Utc};
use lumira_core::{CartItemId, ProductId, ProductSummary, UserId, WishlistItemId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `GET /cart` response.
#[derive(Debug, Clone, Deserialize)]
pub struct CartEnvelope {
    pub items: Vec<CartItemPayload>,
    /// Server-computed sum of quantities; the canonical snapshot recomputes
    /// its own totals from the embedded prices.
    pub total_items: u32,
    pub total_price: Decimal,
}

/// One cart item as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItemPayload {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Absent when the product row has since been deleted; such items are
    /// dropped at the boundary.
    #[serde(default)]
    pub product: Option<ProductSummary>,
}

/// `POST /cart/items` request body.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemCreate {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// `PUT /cart/items/{product_id}` request body.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemUpdate {
    pub quantity: u32,
}

/// One element of the `POST /cart/sync` request body.
///
/// The server merges with a max-quantity upsert per product, so re-sending
/// an entry that already exists never duplicates it.
#[derive(Debug, Clone, Serialize)]
pub struct CartSyncEntry {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// `GET /wishlist` response.
#[derive(Debug, Clone, Deserialize)]
pub struct WishlistEnvelope {
    pub items: Vec<WishlistItemPayload>,
    pub total_items: u32,
}

/// One wishlist item as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct WishlistItemPayload {
    pub id: WishlistItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub product: Option<ProductSummary>,
}
