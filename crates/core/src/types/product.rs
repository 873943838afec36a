//! Product summary embedded in cart and wishlist entries.
//!
//! This is the list-view product payload the backend attaches to collection
//! items. It carries the price at the time the entry was fetched; totals are
//! always computed from this embedded price, never re-fetched.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::price::{CurrencyCode, Price};

/// Product lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Draft,
    #[default]
    Active,
    Inactive,
    OutOfStock,
    Discontinued,
}

/// Summary of a product as embedded in collection entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub short_description: Option<String>,
    /// Unit price in the store currency, as a decimal string on the wire.
    pub price: Decimal,
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
    pub stock_quantity: i32,
    #[serde(default)]
    pub status: ProductStatus,
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    /// Primary image URL, when the product has one.
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProductSummary {
    /// The embedded unit price with the store currency attached.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::new(self.price, CurrencyCode::default())
    }
}
