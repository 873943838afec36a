//! Lumira Shop - cart and wishlist reconciliation library.
//!
//! The storefront keeps two per-user shopping collections: the cart and the
//! wishlist. Each collection has two possible sources: a device-scoped local
//! cache that is always available, and the account-scoped remote store behind
//! the REST backend that is only reachable when the user is authenticated.
//! This crate presents a single canonical in-memory snapshot of each
//! collection regardless of authentication state and keeps the two sources
//! reconciled.
//!
//! # Architecture
//!
//! - [`snapshot`] - pure canonical-snapshot types with the collection
//!   invariants (unique product per snapshot, cart quantities >= 1)
//! - [`cache`] - the persistent local cache (a JSON slot per collection)
//! - [`api`] - wire schemas and the remote-store seam (`CartApi` /
//!   `WishlistApi`), plus the `reqwest`-backed implementation
//! - [`cart`] / [`wishlist`] - the reconciliation controllers
//! - [`context`] - the per-session context object that owns both controllers
//!
//! # Failure policy
//!
//! No controller operation surfaces an error to the caller. A failed remote
//! call is logged and absorbed: the same mutation is applied to the in-memory
//! snapshot and the controller enters degraded mode until the next successful
//! fetch. Unparseable local cache data reads as an empty collection.
//!
//! # Example
//!
//! ```rust,ignore
//! use lumira_shop::config::ShopConfig;
//! use lumira_shop::context::ShopContext;
//! use lumira_shop::session::AccessToken;
//!
//! let config = ShopConfig::from_env()?;
//! let mut ctx = ShopContext::from_config(&config)?;
//!
//! // Anonymous browsing: mutations land in the local cache
//! ctx.start(None).await;
//! ctx.cart_mut().add(product, 2).await;
//!
//! // Login merges the anonymous cart into the account cart
//! ctx.login(AccessToken::new(token)).await;
//! assert_eq!(ctx.cart().total_items(), 2);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cache;
pub mod cart;
pub mod config;
pub mod context;
pub mod session;
pub mod snapshot;
pub mod wishlist;

pub use cart::CartController;
pub use context::ShopContext;
pub use session::{AccessToken, SyncState};
pub use wishlist::WishlistController;
