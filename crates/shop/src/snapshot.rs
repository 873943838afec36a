//! Canonical in-memory collection snapshots.
//!
//! A snapshot is the single list the UI renders from, whatever the current
//! source of truth is. Two invariants hold at all times:
//!
//! - a product appears at most once per snapshot
//! - cart quantities are always >= 1; setting a quantity to zero removes the
//!   entry instead of retaining it
//!
//! The types here are pure and synchronous. All remote/local mediation lives
//! in the controllers.

use lumira_core::{CurrencyCode, Price, ProductId, ProductSummary};
use serde::{Deserialize, Serialize};

/// One cart line: a product plus a positive quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: ProductSummary,
    pub quantity: u32,
}

/// One wishlist entry. The wishlist is a set, so the product is the whole
/// entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub product: ProductSummary,
}

/// Canonical cart snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartSnapshot {
    entries: Vec<CartEntry>,
}

impl CartSnapshot {
    /// An empty snapshot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a snapshot from a list of entries, enforcing the invariants.
    ///
    /// Duplicate products are folded together by summing quantities;
    /// zero-quantity entries are dropped.
    #[must_use]
    pub fn from_entries(entries: Vec<CartEntry>) -> Self {
        let mut snapshot = Self::default();
        for entry in entries {
            snapshot.add(entry.product, entry.quantity);
        }
        snapshot
    }

    /// The entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the cart holds the given product.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.quantity_of(product_id).is_some()
    }

    /// Quantity for the given product, if present.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.product.id == product_id)
            .map(|entry| entry.quantity)
    }

    /// Insert a product or increment its quantity if already present.
    ///
    /// A zero quantity is a no-op.
    pub fn add(&mut self, product: ProductSummary, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.product.id == product.id)
        {
            entry.quantity = entry.quantity.saturating_add(quantity);
        } else {
            self.entries.push(CartEntry { product, quantity });
        }
    }

    /// Set the quantity for a product already in the cart.
    ///
    /// Zero removes the entry. Setting a quantity for an absent product is a
    /// no-op (the entry may have been removed by a concurrent tab).
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.product.id == product_id)
        {
            entry.quantity = quantity;
        }
    }

    /// Remove a product from the cart.
    pub fn remove(&mut self, product_id: ProductId) {
        self.entries.retain(|entry| entry.product.id != product_id);
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of quantities across all entries.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.entries
            .iter()
            .fold(0, |acc, entry| acc.saturating_add(entry.quantity))
    }

    /// Sum of quantity x embedded unit price across all entries.
    ///
    /// Reflects the price at the time of add/last load, not the live price.
    #[must_use]
    pub fn total_price(&self) -> Price {
        let total = self
            .entries
            .iter()
            .map(|entry| entry.product.unit_price().times(entry.quantity).amount)
            .sum();
        Price::new(total, CurrencyCode::default())
    }
}

/// Canonical wishlist snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WishlistSnapshot {
    entries: Vec<WishlistEntry>,
}

impl WishlistSnapshot {
    /// An empty snapshot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a snapshot from a list of entries, dropping duplicates.
    #[must_use]
    pub fn from_entries(entries: Vec<WishlistEntry>) -> Self {
        let mut snapshot = Self::default();
        for entry in entries {
            snapshot.insert(entry.product);
        }
        snapshot
    }

    /// The entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    /// Number of saved products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the wishlist holds the given product.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.product.id == product_id)
    }

    /// Insert a product. Returns `false` if it was already present
    /// (insertion is idempotent).
    pub fn insert(&mut self, product: ProductSummary) -> bool {
        if self.contains(product.id) {
            return false;
        }
        self.entries.push(WishlistEntry { product });
        true
    }

    /// Remove a product from the wishlist.
    pub fn remove(&mut self, product_id: ProductId) {
        self.entries.retain(|entry| entry.product.id != product_id);
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Product IDs in insertion order, for the batch sync endpoint.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.entries.iter().map(|entry| entry.product.id).collect()
    }
}
