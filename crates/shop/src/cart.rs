//! Cart reconciliation controller.
//!
//! Owns the canonical cart snapshot and mediates between the local cache and
//! the remote store depending on authentication state. Mutations while
//! anonymous land in the local cache; mutations while authenticated go to
//! the backend with the local cache kept as an offline mirror. Any remote
//! failure falls back to mutating the snapshot directly so the UI stays
//! responsive.
//!
//! No operation here returns an error: failures are logged and absorbed into
//! the fallback branch (see the crate docs for the full policy).

use lumira_core::{Price, ProductId, ProductSummary};

use crate::api::{CartApi, CartEnvelope, CartItemCreate, CartItemUpdate, CartSyncEntry};
use crate::cache::{self, CacheSlot, LocalStore};
use crate::session::{AccessToken, SyncState};
use crate::snapshot::{CartEntry, CartSnapshot};

/// Reconciliation controller for the shopping cart.
///
/// One instance lives for the whole application session. Constructed via
/// [`CartController::new`] followed by [`CartController::load`] (or
/// [`CartController::login`], which loads implicitly).
#[derive(Debug)]
pub struct CartController<A, S> {
    api: A,
    store: S,
    state: SyncState,
    snapshot: CartSnapshot,
}

impl<A: CartApi, S: LocalStore> CartController<A, S> {
    /// Create a controller in the anonymous state with an empty snapshot.
    ///
    /// Call [`Self::load`] to populate the snapshot from the local cache.
    pub const fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            state: SyncState::AnonymousLocal,
            snapshot: CartSnapshot::new(),
        }
    }

    /// The canonical snapshot currently presented to the UI.
    #[must_use]
    pub const fn snapshot(&self) -> &CartSnapshot {
        &self.snapshot
    }

    /// Current source-of-truth state, for observability.
    #[must_use]
    pub const fn state(&self) -> &SyncState {
        &self.state
    }

    /// Whether the cart holds the given product. Pure lookup, no side
    /// effects.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.snapshot.contains(product_id)
    }

    /// Sum of quantities across the canonical snapshot.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.snapshot.total_items()
    }

    /// Sum of quantity x embedded unit price across the canonical snapshot.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.snapshot.total_price()
    }

    /// Transition to the authenticated state and reload.
    ///
    /// Triggers the one-time merge of a non-empty anonymous cart into an
    /// empty account cart.
    pub async fn login(&mut self, token: AccessToken) {
        self.state = SyncState::Remote { token };
        self.load().await;
    }

    /// Abandon the remote store and resume the local cache as canonical,
    /// starting from whatever was last mirrored.
    pub fn logout(&mut self) {
        self.state = SyncState::AnonymousLocal;
        self.snapshot = CartSnapshot::from_entries(self.read_local());
    }

    /// Derive the canonical snapshot for the current authentication state.
    ///
    /// Authenticated: fetch the remote cart and mirror it locally; if the
    /// remote cart is empty and the local cache is not, push the local
    /// entries via the batch sync endpoint first and re-fetch. A fetch
    /// failure serves the local mirror and enters degraded mode.
    ///
    /// Anonymous: read the local cache (empty if absent or unparseable).
    pub async fn load(&mut self) {
        let Some(token) = self.state.token().cloned() else {
            self.snapshot = CartSnapshot::from_entries(self.read_local());
            return;
        };

        match self.api.fetch_cart(&token).await {
            Ok(envelope) => {
                let fetched = snapshot_from_envelope(envelope);
                let local = CartSnapshot::from_entries(self.read_local());
                if fetched.is_empty() && !local.is_empty() {
                    self.merge_local_into_remote(token, local).await;
                } else {
                    self.snapshot = fetched;
                    self.state = SyncState::Remote { token };
                    self.mirror();
                }
            }
            Err(error) => {
                tracing::warn!(%error, "cart fetch failed, serving local mirror");
                self.snapshot = CartSnapshot::from_entries(self.read_local());
                self.state = SyncState::Degraded { token };
            }
        }
    }

    /// Add a product (or increment its quantity) in the canonical snapshot.
    ///
    /// A zero quantity is a no-op. Authenticated failures apply the same
    /// mutation locally instead.
    pub async fn add(&mut self, product: ProductSummary, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let Some(token) = self.state.token().cloned() else {
            self.snapshot.add(product, quantity);
            self.mirror();
            return;
        };

        let product_id = product.id;
        let result = if let Some(existing) = self.snapshot.quantity_of(product_id) {
            let update = CartItemUpdate {
                quantity: existing.saturating_add(quantity),
            };
            self.api
                .update_cart_item(&token, product_id, &update)
                .await
                .map(drop)
        } else {
            let create = CartItemCreate {
                product_id,
                quantity,
            };
            self.api.create_cart_item(&token, &create).await.map(drop)
        };

        match result {
            Ok(()) => self.refresh(token).await,
            Err(error) => {
                tracing::warn!(%error, %product_id, "cart add failed, applying local fallback");
                self.snapshot.add(product, quantity);
                self.state = SyncState::Degraded { token };
                self.mirror();
            }
        }
    }

    /// Remove a product from the cart.
    ///
    /// Converges by filtering the snapshot whether the remote delete
    /// succeeded or not; a failure additionally enters degraded mode.
    pub async fn remove(&mut self, product_id: ProductId) {
        if let Some(token) = self.state.token().cloned()
            && let Err(error) = self.api.delete_cart_item(&token, product_id).await
        {
            tracing::warn!(%error, %product_id, "cart remove failed, applying local fallback");
            self.state = SyncState::Degraded { token };
        }
        self.snapshot.remove(product_id);
        self.mirror();
    }

    /// Set the quantity for a product. Zero is equivalent to
    /// [`Self::remove`].
    pub async fn update_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id).await;
            return;
        }
        let Some(token) = self.state.token().cloned() else {
            self.snapshot.set_quantity(product_id, quantity);
            self.mirror();
            return;
        };

        let update = CartItemUpdate { quantity };
        match self.api.update_cart_item(&token, product_id, &update).await {
            Ok(_) => self.refresh(token).await,
            Err(error) => {
                tracing::warn!(%error, %product_id, "cart update failed, applying local fallback");
                self.snapshot.set_quantity(product_id, quantity);
                self.state = SyncState::Degraded { token };
                self.mirror();
            }
        }
    }

    /// Empty the cart and erase the local slot.
    ///
    /// A failed remote delete is still treated as success from the caller's
    /// perspective; the snapshot is forced empty either way (see the design
    /// notes for why this is preserved as-is).
    pub async fn clear(&mut self) {
        if let Some(token) = self.state.token().cloned()
            && let Err(error) = self.api.clear_cart(&token).await
        {
            tracing::error!(%error, "cart clear failed on the server, forcing empty snapshot");
            self.state = SyncState::Degraded { token };
        }
        self.snapshot.clear();
        self.store.remove(CacheSlot::Cart);
    }

    /// Push the current snapshot into the remote cart and re-fetch.
    ///
    /// Invoked right before an authenticated checkout so any last-second
    /// local-only mutations reach the store the order is created from.
    /// Idempotent: the server upserts by product with max-quantity merge.
    /// A no-op while anonymous or with an empty snapshot.
    pub async fn sync_local_into_remote(&mut self) {
        let Some(token) = self.state.token().cloned() else {
            return;
        };
        if self.snapshot.is_empty() {
            return;
        }

        let items: Vec<CartSyncEntry> = self
            .snapshot
            .entries()
            .iter()
            .map(|entry| CartSyncEntry {
                product_id: entry.product.id,
                quantity: entry.quantity,
            })
            .collect();

        match self.api.sync_cart(&token, &items).await {
            Ok(()) => self.refresh(token).await,
            Err(error) => {
                tracing::warn!(%error, "cart sync failed, keeping local snapshot");
                self.state = SyncState::Degraded { token };
            }
        }
    }

    /// Fetch-only reload after a successful mutation.
    async fn refresh(&mut self, token: AccessToken) {
        match self.api.fetch_cart(&token).await {
            Ok(envelope) => {
                self.snapshot = snapshot_from_envelope(envelope);
                self.state = SyncState::Remote { token };
                self.mirror();
            }
            Err(error) => {
                // Keep the pre-fetch snapshot; the mutation itself succeeded
                tracing::warn!(%error, "cart refresh failed, keeping current snapshot");
                self.state = SyncState::Degraded { token };
                self.mirror();
            }
        }
    }

    /// One-time push of the anonymous cart into an empty account cart.
    async fn merge_local_into_remote(&mut self, token: AccessToken, local: CartSnapshot) {
        tracing::info!(
            entries = local.len(),
            "merging anonymous cart into empty account cart"
        );
        let items: Vec<CartSyncEntry> = local
            .entries()
            .iter()
            .map(|entry| CartSyncEntry {
                product_id: entry.product.id,
                quantity: entry.quantity,
            })
            .collect();

        match self.api.sync_cart(&token, &items).await {
            Ok(()) => match self.api.fetch_cart(&token).await {
                Ok(envelope) => {
                    self.snapshot = snapshot_from_envelope(envelope);
                    self.state = SyncState::Remote { token };
                    self.mirror();
                }
                Err(error) => {
                    tracing::warn!(%error, "re-fetch after cart merge failed, keeping local entries");
                    self.snapshot = local;
                    self.state = SyncState::Degraded { token };
                }
            },
            Err(error) => {
                tracing::warn!(%error, "cart merge failed, keeping local entries");
                self.snapshot = local;
                self.state = SyncState::Degraded { token };
            }
        }
    }

    fn read_local(&self) -> Vec<CartEntry> {
        cache::read_entries(&self.store, CacheSlot::Cart)
    }

    fn mirror(&self) {
        cache::write_entries(&self.store, CacheSlot::Cart, self.snapshot.entries());
    }
}

/// Map the wire envelope into a canonical snapshot, dropping items whose
/// product payload is missing.
fn snapshot_from_envelope(envelope: CartEnvelope) -> CartSnapshot {
    let entries = envelope
        .items
        .into_iter()
        .filter_map(|item| {
            item.product.map(|product| CartEntry {
                product,
                quantity: item.quantity,
            })
        })
        .collect();
    CartSnapshot::from_entries(entries)
}
