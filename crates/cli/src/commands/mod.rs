//! Command implementations for the Lumira CLI.

pub mod cart;
pub mod wishlist;

use lumira_core::ProductId;
use lumira_shop::api::ApiError;
use lumira_shop::cache::CacheError;
use lumira_shop::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Local cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Invalid product ID '{0}': expected a UUID")]
    InvalidProductId(String),
}

/// Parses a product ID argument, surfacing a readable error on bad input.
///
/// # Errors
///
/// Returns [`CliError::InvalidProductId`] when the argument is not a UUID.
pub fn parse_product_id(raw: &str) -> Result<ProductId, CliError> {
    raw.parse()
        .map_err(|_| CliError::InvalidProductId(raw.to_owned()))
}
