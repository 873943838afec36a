//! Wishlist reconciliation controller.
//!
//! Same shape as the cart controller, but over a set of products: additions
//! are idempotent, there are no quantities, and a 409 conflict from the
//! create endpoint is confirmation the entry already exists rather than an
//! error.

use lumira_core::{ProductId, ProductSummary};

use crate::api::{WishlistApi, WishlistEnvelope};
use crate::cache::{self, CacheSlot, LocalStore};
use crate::session::{AccessToken, SyncState};
use crate::snapshot::{WishlistEntry, WishlistSnapshot};

/// Reconciliation controller for the wishlist.
#[derive(Debug)]
pub struct WishlistController<A, S> {
    api: A,
    store: S,
    state: SyncState,
    snapshot: WishlistSnapshot,
}

impl<A: WishlistApi, S: LocalStore> WishlistController<A, S> {
    /// Create a controller in the anonymous state with an empty snapshot.
    pub const fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            state: SyncState::AnonymousLocal,
            snapshot: WishlistSnapshot::new(),
        }
    }

    /// The canonical snapshot currently presented to the UI.
    #[must_use]
    pub const fn snapshot(&self) -> &WishlistSnapshot {
        &self.snapshot
    }

    /// Current source-of-truth state, for observability.
    #[must_use]
    pub const fn state(&self) -> &SyncState {
        &self.state
    }

    /// Whether the wishlist holds the given product. Pure lookup, no side
    /// effects.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.snapshot.contains(product_id)
    }

    /// Number of saved products.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.snapshot.len()
    }

    /// Transition to the authenticated state and reload.
    pub async fn login(&mut self, token: AccessToken) {
        self.state = SyncState::Remote { token };
        self.load().await;
    }

    /// Abandon the remote store and resume the local cache as canonical.
    pub fn logout(&mut self) {
        self.state = SyncState::AnonymousLocal;
        self.snapshot = WishlistSnapshot::from_entries(self.read_local());
    }

    /// Derive the canonical snapshot for the current authentication state.
    ///
    /// Same merge-on-first-login behavior as the cart: an empty remote
    /// wishlist paired with a non-empty local one is populated via the batch
    /// sync endpoint before the canonical snapshot is taken from the remote.
    pub async fn load(&mut self) {
        let Some(token) = self.state.token().cloned() else {
            self.snapshot = WishlistSnapshot::from_entries(self.read_local());
            return;
        };

        match self.api.fetch_wishlist(&token).await {
            Ok(envelope) => {
                let fetched = snapshot_from_envelope(envelope);
                let local = WishlistSnapshot::from_entries(self.read_local());
                if fetched.is_empty() && !local.is_empty() {
                    self.merge_local_into_remote(token, local).await;
                } else {
                    self.snapshot = fetched;
                    self.state = SyncState::Remote { token };
                    self.mirror();
                }
            }
            Err(error) => {
                tracing::warn!(%error, "wishlist fetch failed, serving local mirror");
                self.snapshot = WishlistSnapshot::from_entries(self.read_local());
                self.state = SyncState::Degraded { token };
            }
        }
    }

    /// Add a product to the wishlist. Idempotent: adding a product that is
    /// already saved leaves the snapshot unchanged.
    pub async fn add(&mut self, product: ProductSummary) {
        let Some(token) = self.state.token().cloned() else {
            if self.snapshot.insert(product) {
                self.mirror();
            }
            return;
        };

        if self.snapshot.contains(product.id) {
            return;
        }

        let product_id = product.id;
        match self.api.create_wishlist_item(&token, product_id).await {
            Ok(_) => self.refresh(token).await,
            Err(error) if error.is_conflict() => {
                // Already saved server-side; confirmation, not an error
                tracing::debug!(%product_id, "wishlist add conflict, entry already exists");
                self.refresh(token).await;
            }
            Err(error) => {
                tracing::warn!(%error, %product_id, "wishlist add failed, applying local fallback");
                self.snapshot.insert(product);
                self.state = SyncState::Degraded { token };
                self.mirror();
            }
        }
    }

    /// Remove a product from the wishlist.
    ///
    /// Converges by filtering the snapshot whether the remote delete
    /// succeeded or not.
    pub async fn remove(&mut self, product_id: ProductId) {
        if let Some(token) = self.state.token().cloned()
            && let Err(error) = self.api.delete_wishlist_item(&token, product_id).await
        {
            tracing::warn!(%error, %product_id, "wishlist remove failed, applying local fallback");
            self.state = SyncState::Degraded { token };
        }
        self.snapshot.remove(product_id);
        self.mirror();
    }

    /// Remove the product if saved, add it otherwise.
    pub async fn toggle(&mut self, product: ProductSummary) {
        if self.snapshot.contains(product.id) {
            self.remove(product.id).await;
        } else {
            self.add(product).await;
        }
    }

    /// Empty the wishlist and erase the local slot.
    ///
    /// As with the cart, a failed remote delete still yields an empty
    /// snapshot.
    pub async fn clear(&mut self) {
        if let Some(token) = self.state.token().cloned()
            && let Err(error) = self.api.clear_wishlist(&token).await
        {
            tracing::error!(%error, "wishlist clear failed on the server, forcing empty snapshot");
            self.state = SyncState::Degraded { token };
        }
        self.snapshot.clear();
        self.store.remove(CacheSlot::Wishlist);
    }

    /// Push the current snapshot into the remote wishlist (set-union merge)
    /// and re-fetch. A no-op while anonymous or with an empty snapshot.
    pub async fn sync_local_into_remote(&mut self) {
        let Some(token) = self.state.token().cloned() else {
            return;
        };
        if self.snapshot.is_empty() {
            return;
        }

        let product_ids = self.snapshot.product_ids();
        match self.api.sync_wishlist(&token, &product_ids).await {
            Ok(()) => self.refresh(token).await,
            Err(error) => {
                tracing::warn!(%error, "wishlist sync failed, keeping local snapshot");
                self.state = SyncState::Degraded { token };
            }
        }
    }

    /// Fetch-only reload after a successful mutation.
    async fn refresh(&mut self, token: AccessToken) {
        match self.api.fetch_wishlist(&token).await {
            Ok(envelope) => {
                self.snapshot = snapshot_from_envelope(envelope);
                self.state = SyncState::Remote { token };
                self.mirror();
            }
            Err(error) => {
                tracing::warn!(%error, "wishlist refresh failed, keeping current snapshot");
                self.state = SyncState::Degraded { token };
                self.mirror();
            }
        }
    }

    /// One-time push of the anonymous wishlist into an empty account
    /// wishlist.
    async fn merge_local_into_remote(&mut self, token: AccessToken, local: WishlistSnapshot) {
        tracing::info!(
            entries = local.len(),
            "merging anonymous wishlist into empty account wishlist"
        );
        match self.api.sync_wishlist(&token, &local.product_ids()).await {
            Ok(()) => match self.api.fetch_wishlist(&token).await {
                Ok(envelope) => {
                    self.snapshot = snapshot_from_envelope(envelope);
                    self.state = SyncState::Remote { token };
                    self.mirror();
                }
                Err(error) => {
                    tracing::warn!(%error, "re-fetch after wishlist merge failed, keeping local entries");
                    self.snapshot = local;
                    self.state = SyncState::Degraded { token };
                }
            },
            Err(error) => {
                tracing::warn!(%error, "wishlist merge failed, keeping local entries");
                self.snapshot = local;
                self.state = SyncState::Degraded { token };
            }
        }
    }

    fn read_local(&self) -> Vec<WishlistEntry> {
        cache::read_entries(&self.store, CacheSlot::Wishlist)
    }

    fn mirror(&self) {
        cache::write_entries(&self.store, CacheSlot::Wishlist, self.snapshot.entries());
    }
}

/// Map the wire envelope into a canonical snapshot, dropping items whose
/// product payload is missing.
fn snapshot_from_envelope(envelope: WishlistEnvelope) -> WishlistSnapshot {
    let entries = envelope
        .items
        .into_iter()
        .filter_map(|item| item.product.map(|product| WishlistEntry { product }))
        .collect();
    WishlistSnapshot::from_entries(entries)
}
