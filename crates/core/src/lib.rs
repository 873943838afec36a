//! Lumira Core - Shared types library.
//!
//! This crate provides common types used across all Lumira client components:
//! - `shop` - Cart and wishlist reconciliation library
//! - `cli` - Command-line client for driving a shopping session
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and product
//!   summaries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
