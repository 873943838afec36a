//! Per-session shopping context.
//!
//! One `ShopContext` is constructed at session start, owns both
//! reconciliation controllers, and is passed by reference to whatever needs
//! cart or wishlist access. There is no ambient global state; tearing the
//! context down ends the session.

use thiserror::Error;

use crate::api::{ApiError, CartApi, HttpApi, WishlistApi};
use crate::cache::{CacheError, FileStore, LocalStore};
use crate::cart::CartController;
use crate::config::ShopConfig;
use crate::session::AccessToken;
use crate::wishlist::WishlistController;

/// Errors constructing a shopping context.
#[derive(Debug, Error)]
pub enum ContextError {
    /// HTTP client could not be built.
    #[error("API client error: {0}")]
    Api(#[from] ApiError),

    /// Local cache directory could not be opened.
    #[error("Local cache error: {0}")]
    Cache(#[from] CacheError),
}

/// The shopping collections for one application session.
pub struct ShopContext<A, S> {
    cart: CartController<A, S>,
    wishlist: WishlistController<A, S>,
}

impl ShopContext<HttpApi, FileStore> {
    /// Build the production context: HTTP-backed remote store, file-backed
    /// local cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the cache
    /// directory cannot be created.
    pub fn from_config(config: &ShopConfig) -> Result<Self, ContextError> {
        let api = HttpApi::new(config)?;
        let store = FileStore::open(&config.cache_dir)?;
        Ok(Self::new(api, store))
    }
}

impl<A, S> ShopContext<A, S>
where
    A: CartApi + WishlistApi + Clone,
    S: LocalStore + Clone,
{
    /// Assemble a context from a remote store implementation and a local
    /// store.
    pub fn new(api: A, store: S) -> Self {
        Self {
            cart: CartController::new(api.clone(), store.clone()),
            wishlist: WishlistController::new(api, store),
        }
    }

    /// Load both collections for the session's initial authentication
    /// state: authenticated when a token is supplied, anonymous otherwise.
    pub async fn start(&mut self, token: Option<AccessToken>) {
        match token {
            Some(token) => self.login(token).await,
            None => {
                self.cart.load().await;
                self.wishlist.load().await;
            }
        }
    }

    /// Authenticate both collections, triggering the one-time merge of any
    /// anonymous entries into empty account collections.
    pub async fn login(&mut self, token: AccessToken) {
        self.cart.login(token.clone()).await;
        self.wishlist.login(token).await;
    }

    /// Drop back to anonymous; the local mirrors resume as canonical.
    pub fn logout(&mut self) {
        self.cart.logout();
        self.wishlist.logout();
    }

    /// Push any local-only cart mutations to the remote store before an
    /// authenticated checkout creates the order from it.
    pub async fn prepare_checkout(&mut self) {
        self.cart.sync_local_into_remote().await;
    }

    /// Read access to the cart controller.
    #[must_use]
    pub const fn cart(&self) -> &CartController<A, S> {
        &self.cart
    }

    /// Mutable access to the cart controller.
    pub const fn cart_mut(&mut self) -> &mut CartController<A, S> {
        &mut self.cart
    }

    /// Read access to the wishlist controller.
    #[must_use]
    pub const fn wishlist(&self) -> &WishlistController<A, S> {
        &self.wishlist
    }

    /// Mutable access to the wishlist controller.
    pub const fn wishlist_mut(&mut self) -> &mut WishlistController<A, S> {
        &mut self.wishlist
    }
}
