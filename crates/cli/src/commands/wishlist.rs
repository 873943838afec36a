//! Wishlist subcommands.

use lumira_shop::api::HttpApi;
use lumira_shop::cache::FileStore;
use lumira_shop::snapshot::WishlistSnapshot;
use lumira_shop::ShopContext;

use super::{parse_product_id, CliError};

type Session = ShopContext<HttpApi, FileStore>;

/// Prints the current wishlist.
#[allow(clippy::print_stdout)]
pub fn show(session: &Session) {
    let wishlist = session.wishlist();
    print_snapshot(wishlist.snapshot());
    println!("Session: {}", wishlist.state().label());
}

/// Fetches the product from the catalog and saves it to the wishlist.
///
/// Adding an already-saved product is a no-op.
///
/// # Errors
///
/// Returns an error when the product ID is malformed or the catalog
/// lookup fails.
pub async fn add(session: &mut Session, api: &HttpApi, product_id: &str) -> Result<(), CliError> {
    let product_id = parse_product_id(product_id)?;
    let product = api.fetch_product(product_id).await?;

    session.wishlist_mut().add(product).await;
    show(session);
    Ok(())
}

/// Removes a product from the wishlist.
///
/// # Errors
///
/// Returns an error when the product ID is malformed.
pub async fn remove(session: &mut Session, product_id: &str) -> Result<(), CliError> {
    let product_id = parse_product_id(product_id)?;

    session.wishlist_mut().remove(product_id).await;
    show(session);
    Ok(())
}

/// Saves the product if absent, removes it if already saved.
///
/// # Errors
///
/// Returns an error when the product ID is malformed or the catalog
/// lookup fails.
pub async fn toggle(
    session: &mut Session,
    api: &HttpApi,
    product_id: &str,
) -> Result<(), CliError> {
    let product_id = parse_product_id(product_id)?;
    let product = api.fetch_product(product_id).await?;

    session.wishlist_mut().toggle(product).await;
    show(session);
    Ok(())
}

/// Empties the wishlist.
#[allow(clippy::print_stdout)]
pub async fn clear(session: &mut Session) {
    session.wishlist_mut().clear().await;
    println!("Wishlist cleared.");
}

#[allow(clippy::print_stdout)]
fn print_snapshot(snapshot: &WishlistSnapshot) {
    if snapshot.is_empty() {
        println!("Wishlist is empty.");
        return;
    }

    println!("{:<14} {:<32} {:>12}", "SKU", "NAME", "PRICE");
    for entry in snapshot.entries() {
        println!(
            "{:<14} {:<32} {:>12}",
            entry.product.sku,
            entry.product.name,
            entry.product.unit_price().display(),
        );
    }
    println!("{} saved", snapshot.len());
}
