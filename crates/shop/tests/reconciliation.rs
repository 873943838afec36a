//! End-to-end reconciliation scenarios against a scripted in-memory backend.
//!
//! The fake backend implements the same contract as the REST API (including
//! the 409 wishlist conflict and the idempotent batch sync endpoints) and
//! supports per-operation failure injection, so every fallback branch of the
//! controllers can be exercised deterministically.

#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use chrono::Utc;
use lumira_core::{CartItemId, ProductId, ProductStatus, ProductSummary, UserId, WishlistItemId};
use lumira_shop::api::types::{
    CartEnvelope, CartItemCreate, CartItemPayload, CartItemUpdate, CartSyncEntry,
    WishlistEnvelope, WishlistItemPayload,
};
use lumira_shop::api::{ApiError, CartApi, WishlistApi};
use lumira_shop::cache::{CacheSlot, LocalStore, MemoryStore};
use lumira_shop::{AccessToken, CartController, ShopContext, WishlistController};
use rust_decimal::Decimal;

// =============================================================================
// Scripted fake backend
// =============================================================================

/// Operations that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Op {
    FetchCart,
    CreateCartItem,
    UpdateCartItem,
    DeleteCartItem,
    ClearCart,
    SyncCart,
    FetchWishlist,
    CreateWishlistItem,
    DeleteWishlistItem,
    ClearWishlist,
    SyncWishlist,
}

#[derive(Default)]
struct BackendState {
    /// Product catalog; sync requests carry only IDs, so fetches resolve
    /// embedded products from here.
    catalog: HashMap<ProductId, ProductSummary>,
    cart: Vec<(ProductId, u32)>,
    wishlist: Vec<ProductId>,
    failing: HashSet<Op>,
    calls: Vec<Op>,
}

/// In-memory stand-in for the storefront backend.
#[derive(Clone, Default)]
struct FakeBackend {
    state: Rc<RefCell<BackendState>>,
}

impl FakeBackend {
    fn new() -> Self {
        Self::default()
    }

    /// Make the given product resolvable by the fake's fetch endpoints.
    fn register(&self, product: &ProductSummary) {
        self.state
            .borrow_mut()
            .catalog
            .insert(product.id, product.clone());
    }

    fn seed_cart(&self, product: &ProductSummary, quantity: u32) {
        self.register(product);
        self.state.borrow_mut().cart.push((product.id, quantity));
    }

    fn seed_wishlist(&self, product: &ProductSummary) {
        self.register(product);
        self.state.borrow_mut().wishlist.push(product.id);
    }

    fn fail(&self, op: Op) {
        self.state.borrow_mut().failing.insert(op);
    }

    fn heal(&self, op: Op) {
        self.state.borrow_mut().failing.remove(&op);
    }

    fn cart_quantity(&self, product_id: ProductId) -> Option<u32> {
        self.state
            .borrow()
            .cart
            .iter()
            .find(|(id, _)| *id == product_id)
            .map(|(_, q)| *q)
    }

    fn cart_len(&self) -> usize {
        self.state.borrow().cart.len()
    }

    fn wishlist_contains(&self, product_id: ProductId) -> bool {
        self.state.borrow().wishlist.contains(&product_id)
    }

    fn wishlist_len(&self) -> usize {
        self.state.borrow().wishlist.len()
    }

    fn calls(&self) -> Vec<Op> {
        self.state.borrow().calls.clone()
    }

    fn guard(&self, op: Op) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(op);
        if state.failing.contains(&op) {
            return Err(ApiError::Api {
                status: 500,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn cart_item_payload(product: ProductSummary, quantity: u32) -> CartItemPayload {
        CartItemPayload {
            id: CartItemId::random(),
            user_id: UserId::random(),
            product_id: product.id,
            quantity,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            product: Some(product),
        }
    }

    fn wishlist_item_payload(product: ProductSummary) -> WishlistItemPayload {
        WishlistItemPayload {
            id: WishlistItemId::random(),
            user_id: UserId::random(),
            product_id: product.id,
            created_at: Utc::now(),
            product: Some(product),
        }
    }
}

impl CartApi for FakeBackend {
    async fn fetch_cart(&self, _: &AccessToken) -> Result<CartEnvelope, ApiError> {
        self.guard(Op::FetchCart)?;
        let state = self.state.borrow();
        let items: Vec<CartItemPayload> = state
            .cart
            .iter()
            .map(|(id, quantity)| {
                let product = state.catalog.get(id).cloned().unwrap();
                Self::cart_item_payload(product, *quantity)
            })
            .collect();
        let total_items = items.iter().map(|i| i.quantity).sum();
        let total_price = items
            .iter()
            .map(|i| i.product.as_ref().unwrap().price * Decimal::from(i.quantity))
            .sum();
        Ok(CartEnvelope {
            items,
            total_items,
            total_price,
        })
    }

    async fn create_cart_item(
        &self,
        _: &AccessToken,
        item: &CartItemCreate,
    ) -> Result<CartItemPayload, ApiError> {
        self.guard(Op::CreateCartItem)?;
        let mut state = self.state.borrow_mut();
        let product = state.catalog.get(&item.product_id).cloned().ok_or_else(|| {
            ApiError::Api {
                status: 404,
                message: "Product not found".to_string(),
            }
        })?;
        // Backend upserts: an existing line gets its quantity incremented
        if let Some(line) = state.cart.iter_mut().find(|(id, _)| *id == item.product_id) {
            line.1 += item.quantity;
            let quantity = line.1;
            return Ok(Self::cart_item_payload(product, quantity));
        }
        state.cart.push((item.product_id, item.quantity));
        Ok(Self::cart_item_payload(product, item.quantity))
    }

    async fn update_cart_item(
        &self,
        _: &AccessToken,
        product_id: ProductId,
        update: &CartItemUpdate,
    ) -> Result<CartItemPayload, ApiError> {
        self.guard(Op::UpdateCartItem)?;
        let mut state = self.state.borrow_mut();
        let product = state.catalog.get(&product_id).cloned().unwrap();
        let line = state
            .cart
            .iter_mut()
            .find(|(id, _)| *id == product_id)
            .ok_or_else(|| ApiError::Api {
                status: 404,
                message: "Cart item not found".to_string(),
            })?;
        line.1 = update.quantity;
        Ok(Self::cart_item_payload(product, update.quantity))
    }

    async fn delete_cart_item(&self, _: &AccessToken, product_id: ProductId) -> Result<(), ApiError> {
        self.guard(Op::DeleteCartItem)?;
        self.state
            .borrow_mut()
            .cart
            .retain(|(id, _)| *id != product_id);
        Ok(())
    }

    async fn clear_cart(&self, _: &AccessToken) -> Result<(), ApiError> {
        self.guard(Op::ClearCart)?;
        self.state.borrow_mut().cart.clear();
        Ok(())
    }

    async fn sync_cart(&self, _: &AccessToken, items: &[CartSyncEntry]) -> Result<(), ApiError> {
        self.guard(Op::SyncCart)?;
        let mut state = self.state.borrow_mut();
        for entry in items {
            if !state.catalog.contains_key(&entry.product_id) {
                continue;
            }
            if let Some(line) = state
                .cart
                .iter_mut()
                .find(|(id, _)| *id == entry.product_id)
            {
                // Max-quantity merge keeps the endpoint idempotent
                line.1 = line.1.max(entry.quantity);
            } else {
                state.cart.push((entry.product_id, entry.quantity));
            }
        }
        Ok(())
    }
}

impl WishlistApi for FakeBackend {
    async fn fetch_wishlist(&self, _: &AccessToken) -> Result<WishlistEnvelope, ApiError> {
        self.guard(Op::FetchWishlist)?;
        let state = self.state.borrow();
        let items: Vec<WishlistItemPayload> = state
            .wishlist
            .iter()
            .map(|id| {
                let product = state.catalog.get(id).cloned().unwrap();
                Self::wishlist_item_payload(product)
            })
            .collect();
        let total_items = u32::try_from(items.len()).unwrap();
        Ok(WishlistEnvelope { items, total_items })
    }

    async fn create_wishlist_item(
        &self,
        _: &AccessToken,
        product_id: ProductId,
    ) -> Result<WishlistItemPayload, ApiError> {
        self.guard(Op::CreateWishlistItem)?;
        let mut state = self.state.borrow_mut();
        if state.wishlist.contains(&product_id) {
            return Err(ApiError::Api {
                status: 409,
                message: format!("Product {product_id} is already in wishlist"),
            });
        }
        let product = state.catalog.get(&product_id).cloned().ok_or_else(|| {
            ApiError::Api {
                status: 404,
                message: "Product not found".to_string(),
            }
        })?;
        state.wishlist.push(product_id);
        Ok(Self::wishlist_item_payload(product))
    }

    async fn delete_wishlist_item(
        &self,
        _: &AccessToken,
        product_id: ProductId,
    ) -> Result<(), ApiError> {
        self.guard(Op::DeleteWishlistItem)?;
        self.state.borrow_mut().wishlist.retain(|id| *id != product_id);
        Ok(())
    }

    async fn clear_wishlist(&self, _: &AccessToken) -> Result<(), ApiError> {
        self.guard(Op::ClearWishlist)?;
        self.state.borrow_mut().wishlist.clear();
        Ok(())
    }

    async fn sync_wishlist(
        &self,
        _: &AccessToken,
        product_ids: &[ProductId],
    ) -> Result<(), ApiError> {
        self.guard(Op::SyncWishlist)?;
        let mut state = self.state.borrow_mut();
        for id in product_ids {
            if state.catalog.contains_key(id) && !state.wishlist.contains(id) {
                state.wishlist.push(*id);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn product(sku: &str, price: &str) -> ProductSummary {
    ProductSummary {
        id: ProductId::random(),
        sku: sku.to_string(),
        name: format!("Product {sku}"),
        slug: sku.to_lowercase(),
        short_description: None,
        price: price.parse().unwrap(),
        compare_at_price: None,
        stock_quantity: 10,
        status: ProductStatus::Active,
        is_active: true,
        is_featured: false,
        image_url: None,
        created_at: None,
    }
}

fn token() -> AccessToken {
    AccessToken::new("test-session-token")
}

// =============================================================================
// Cart scenarios
// =============================================================================

#[tokio::test]
async fn anonymous_cart_merges_into_empty_account_cart_on_login() {
    let backend = FakeBackend::new();
    let store = MemoryStore::new();
    let a = product("A", "10.00");
    let b = product("B", "5.00");
    backend.register(&a);
    backend.register(&b);

    let mut cart = CartController::new(backend.clone(), &store);
    cart.load().await;
    cart.add(a.clone(), 2).await;
    cart.add(b.clone(), 1).await;
    assert_eq!(cart.total_items(), 3);

    cart.login(token()).await;

    // Canonical snapshot keeps the full anonymous entry set
    assert_eq!(cart.snapshot().quantity_of(a.id), Some(2));
    assert_eq!(cart.snapshot().quantity_of(b.id), Some(1));
    assert_eq!(cart.snapshot().len(), 2);
    // ...and the remote store now holds both entries
    assert_eq!(backend.cart_quantity(a.id), Some(2));
    assert_eq!(backend.cart_quantity(b.id), Some(1));
    assert!(cart.state().is_authenticated());
    assert!(!cart.state().is_degraded());
}

#[tokio::test]
async fn non_empty_remote_cart_wins_over_local_on_login() {
    let backend = FakeBackend::new();
    let store = MemoryStore::new();
    let local_only = product("A", "10.00");
    let remote = product("C", "7.00");
    backend.register(&local_only);
    backend.seed_cart(&remote, 1);

    let mut cart = CartController::new(backend.clone(), &store);
    cart.load().await;
    cart.add(local_only.clone(), 2).await;

    cart.login(token()).await;

    // Remote was non-empty, so no merge happens and remote is canonical
    assert!(!cart.contains(local_only.id));
    assert_eq!(cart.snapshot().quantity_of(remote.id), Some(1));
    assert!(backend.cart_quantity(local_only.id).is_none());
    assert!(!backend.calls().contains(&Op::SyncCart));
}

#[tokio::test]
async fn authenticated_add_reloads_from_remote() {
    let backend = FakeBackend::new();
    let store = MemoryStore::new();
    let a = product("A", "19.99");
    backend.register(&a);

    let mut cart = CartController::new(backend.clone(), &store);
    cart.login(token()).await;
    cart.add(a.clone(), 2).await;

    assert_eq!(cart.snapshot().quantity_of(a.id), Some(2));
    assert_eq!(backend.cart_quantity(a.id), Some(2));

    // A second add of the same product issues an update, not a create
    cart.add(a.clone(), 1).await;
    assert_eq!(cart.snapshot().quantity_of(a.id), Some(3));
    assert_eq!(backend.cart_quantity(a.id), Some(3));
    let calls = backend.calls();
    assert_eq!(
        calls.iter().filter(|op| **op == Op::CreateCartItem).count(),
        1
    );
    assert_eq!(
        calls.iter().filter(|op| **op == Op::UpdateCartItem).count(),
        1
    );
}

#[tokio::test]
async fn authenticated_add_failure_applies_local_fallback() {
    let backend = FakeBackend::new();
    let store = MemoryStore::new();
    let a = product("A", "10.00");
    backend.register(&a);

    let mut cart = CartController::new(backend.clone(), &store);
    cart.login(token()).await;
    backend.fail(Op::CreateCartItem);

    cart.add(a.clone(), 2).await;

    // The UI still sees the item even though the server call failed
    assert_eq!(cart.snapshot().quantity_of(a.id), Some(2));
    assert!(cart.state().is_degraded());
    assert!(backend.cart_quantity(a.id).is_none());
}

#[tokio::test]
async fn authenticated_remove_failure_still_filters_snapshot() {
    let backend = FakeBackend::new();
    let store = MemoryStore::new();
    let a = product("A", "10.00");
    backend.seed_cart(&a, 1);

    let mut cart = CartController::new(backend.clone(), &store);
    cart.login(token()).await;
    assert!(cart.contains(a.id));

    backend.fail(Op::DeleteCartItem);
    cart.remove(a.id).await;

    assert!(cart.snapshot().is_empty());
    assert!(cart.state().is_degraded());
    // Server still holds the item; next successful load converges on it
    assert_eq!(backend.cart_quantity(a.id), Some(1));
}

#[tokio::test]
async fn clear_yields_empty_snapshot_even_when_server_fails() {
    let backend = FakeBackend::new();
    let store = MemoryStore::new();
    let a = product("A", "10.00");
    backend.seed_cart(&a, 2);

    let mut cart = CartController::new(backend.clone(), &store);
    cart.login(token()).await;

    backend.fail(Op::ClearCart);
    cart.clear().await;
    assert!(cart.snapshot().is_empty());
    assert!(store.read(CacheSlot::Cart).is_none());

    // And the success path behaves identically from the UI's perspective
    backend.heal(Op::ClearCart);
    cart.load().await;
    cart.clear().await;
    assert!(cart.snapshot().is_empty());
    assert_eq!(backend.cart_len(), 0);
}

#[tokio::test]
async fn fetch_failure_serves_local_mirror_and_recovers() {
    let backend = FakeBackend::new();
    let store = MemoryStore::new();
    let a = product("A", "10.00");
    backend.seed_cart(&a, 2);

    let mut cart = CartController::new(backend.clone(), &store);
    cart.login(token()).await;
    assert_eq!(cart.snapshot().quantity_of(a.id), Some(2));

    // Remote goes down; reload serves the mirror written by the first load
    backend.fail(Op::FetchCart);
    cart.load().await;
    assert_eq!(cart.snapshot().quantity_of(a.id), Some(2));
    assert!(cart.state().is_degraded());

    // Remote comes back; the next successful fetch exits degraded mode
    backend.heal(Op::FetchCart);
    cart.load().await;
    assert!(!cart.state().is_degraded());
    assert_eq!(cart.snapshot().quantity_of(a.id), Some(2));
}

#[tokio::test]
async fn update_quantity_zero_is_remove() {
    let backend = FakeBackend::new();
    let store = MemoryStore::new();
    let a = product("A", "10.00");
    backend.seed_cart(&a, 3);

    let mut cart = CartController::new(backend.clone(), &store);
    cart.login(token()).await;

    cart.update_quantity(a.id, 0).await;
    assert!(!cart.contains(a.id));
    assert!(backend.cart_quantity(a.id).is_none());
    assert!(backend.calls().contains(&Op::DeleteCartItem));
    assert!(!backend.calls().contains(&Op::UpdateCartItem));
}

#[tokio::test]
async fn checkout_sync_is_idempotent() {
    let backend = FakeBackend::new();
    let store = MemoryStore::new();
    let a = product("A", "10.00");
    backend.register(&a);

    let mut cart = CartController::new(backend.clone(), &store);
    cart.login(token()).await;
    cart.add(a.clone(), 2).await;

    cart.sync_local_into_remote().await;
    cart.sync_local_into_remote().await;

    assert_eq!(backend.cart_len(), 1);
    assert_eq!(backend.cart_quantity(a.id), Some(2));
    assert_eq!(cart.snapshot().quantity_of(a.id), Some(2));
}

#[tokio::test]
async fn logout_resumes_local_mirror_as_canonical() {
    let backend = FakeBackend::new();
    let store = MemoryStore::new();
    let a = product("A", "10.00");
    let b = product("B", "5.00");
    backend.seed_cart(&a, 2);
    backend.register(&b);

    let mut cart = CartController::new(backend.clone(), &store);
    cart.login(token()).await;
    assert_eq!(cart.snapshot().quantity_of(a.id), Some(2));

    cart.logout();
    // The mirror written while authenticated carries over
    assert_eq!(cart.snapshot().quantity_of(a.id), Some(2));

    // Anonymous mutations no longer reach the server
    let calls_before = backend.calls().len();
    cart.add(b.clone(), 1).await;
    assert_eq!(backend.calls().len(), calls_before);
    assert!(backend.cart_quantity(b.id).is_none());
    assert_eq!(cart.total_items(), 3);
}

// =============================================================================
// Wishlist scenarios
// =============================================================================

#[tokio::test]
async fn anonymous_wishlist_merges_on_login() {
    let backend = FakeBackend::new();
    let store = MemoryStore::new();
    let a = product("A", "10.00");
    let b = product("B", "5.00");
    backend.register(&a);
    backend.register(&b);

    let mut wishlist = WishlistController::new(backend.clone(), &store);
    wishlist.load().await;
    wishlist.add(a.clone()).await;
    wishlist.add(b.clone()).await;

    wishlist.login(token()).await;

    assert!(wishlist.contains(a.id));
    assert!(wishlist.contains(b.id));
    assert_eq!(wishlist.total_items(), 2);
    assert!(backend.wishlist_contains(a.id));
    assert!(backend.wishlist_contains(b.id));
}

#[tokio::test]
async fn wishlist_add_conflict_is_treated_as_success() {
    let backend = FakeBackend::new();
    let store = MemoryStore::new();
    let a = product("A", "10.00");
    backend.seed_wishlist(&a);

    let mut wishlist = WishlistController::new(backend.clone(), &store);
    // First load fails, so the controller does not know the server already
    // has the product
    backend.fail(Op::FetchWishlist);
    wishlist.login(token()).await;
    assert!(wishlist.snapshot().is_empty());
    assert!(wishlist.state().is_degraded());

    backend.heal(Op::FetchWishlist);
    wishlist.add(a.clone()).await;

    // The 409 confirmed the entry exists; the reload made it canonical
    assert!(wishlist.contains(a.id));
    assert!(!wishlist.state().is_degraded());
    assert_eq!(backend.wishlist_len(), 1);
}

#[tokio::test]
async fn authenticated_wishlist_add_is_idempotent() {
    let backend = FakeBackend::new();
    let store = MemoryStore::new();
    let a = product("A", "10.00");
    backend.register(&a);

    let mut wishlist = WishlistController::new(backend.clone(), &store);
    wishlist.login(token()).await;

    wishlist.add(a.clone()).await;
    let once = wishlist.snapshot().clone();
    wishlist.add(a.clone()).await;

    assert_eq!(wishlist.snapshot(), &once);
    assert_eq!(backend.wishlist_len(), 1);
    // The second add short-circuits on the snapshot, no second create call
    assert_eq!(
        backend
            .calls()
            .iter()
            .filter(|op| **op == Op::CreateWishlistItem)
            .count(),
        1
    );
}

#[tokio::test]
async fn authenticated_wishlist_toggle_round_trip() {
    let backend = FakeBackend::new();
    let store = MemoryStore::new();
    let a = product("A", "10.00");
    backend.register(&a);

    let mut wishlist = WishlistController::new(backend.clone(), &store);
    wishlist.login(token()).await;

    wishlist.toggle(a.clone()).await;
    assert!(wishlist.contains(a.id));
    assert!(backend.wishlist_contains(a.id));

    wishlist.toggle(a.clone()).await;
    assert!(!wishlist.contains(a.id));
    assert!(!backend.wishlist_contains(a.id));
}

#[tokio::test]
async fn wishlist_clear_failure_still_empties_snapshot() {
    let backend = FakeBackend::new();
    let store = MemoryStore::new();
    let a = product("A", "10.00");
    backend.seed_wishlist(&a);

    let mut wishlist = WishlistController::new(backend.clone(), &store);
    wishlist.login(token()).await;

    backend.fail(Op::ClearWishlist);
    wishlist.clear().await;

    assert!(wishlist.snapshot().is_empty());
    assert!(store.read(CacheSlot::Wishlist).is_none());
    assert!(backend.wishlist_contains(a.id));
}

// =============================================================================
// Whole-session scenarios
// =============================================================================

#[tokio::test]
async fn context_session_round_trip() {
    let backend = FakeBackend::new();
    let store = MemoryStore::new();
    let serum = product("SERUM", "42.00");
    let balm = product("BALM", "6.50");
    backend.register(&serum);
    backend.register(&balm);

    let mut ctx = ShopContext::new(backend.clone(), &store);
    ctx.start(None).await;

    // Anonymous browsing
    ctx.cart_mut().add(serum.clone(), 2).await;
    ctx.wishlist_mut().add(balm.clone()).await;
    assert_eq!(ctx.cart().total_items(), 2);
    assert!(ctx.wishlist().contains(balm.id));

    // Login merges both collections into the empty account stores
    ctx.login(token()).await;
    assert_eq!(backend.cart_quantity(serum.id), Some(2));
    assert!(backend.wishlist_contains(balm.id));
    assert_eq!(ctx.cart().total_price().display(), "$84.00");

    // Pre-checkout sync is a no-op here but must not disturb state
    ctx.prepare_checkout().await;
    assert_eq!(ctx.cart().total_items(), 2);

    // Logout resumes the mirror
    ctx.logout();
    assert_eq!(ctx.cart().total_items(), 2);
    assert!(ctx.wishlist().contains(balm.id));
}
