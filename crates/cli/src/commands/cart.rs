//! Cart subcommands.

use lumira_shop::api::HttpApi;
use lumira_shop::cache::FileStore;
use lumira_shop::snapshot::CartSnapshot;
use lumira_shop::ShopContext;

use super::{parse_product_id, CliError};

type Session = ShopContext<HttpApi, FileStore>;

/// Prints the current cart.
#[allow(clippy::print_stdout)]
pub fn show(session: &Session) {
    let cart = session.cart();
    print_snapshot(cart.snapshot());
    println!("Session: {}", cart.state().label());
}

/// Fetches the product from the catalog and adds it to the cart.
///
/// # Errors
///
/// Returns an error when the product ID is malformed or the catalog
/// lookup fails. Cart mutations themselves never fail; a remote outage
/// degrades the session and keeps the change locally.
pub async fn add(
    session: &mut Session,
    api: &HttpApi,
    product_id: &str,
    quantity: u32,
) -> Result<(), CliError> {
    let product_id = parse_product_id(product_id)?;
    let product = api.fetch_product(product_id).await?;

    session.cart_mut().add(product, quantity).await;
    show(session);
    Ok(())
}

/// Sets the quantity of a cart line. Zero removes the line.
///
/// # Errors
///
/// Returns an error when the product ID is malformed.
pub async fn set_quantity(
    session: &mut Session,
    product_id: &str,
    quantity: u32,
) -> Result<(), CliError> {
    let product_id = parse_product_id(product_id)?;

    session.cart_mut().update_quantity(product_id, quantity).await;
    show(session);
    Ok(())
}

/// Removes a product from the cart.
///
/// # Errors
///
/// Returns an error when the product ID is malformed.
pub async fn remove(session: &mut Session, product_id: &str) -> Result<(), CliError> {
    let product_id = parse_product_id(product_id)?;

    session.cart_mut().remove(product_id).await;
    show(session);
    Ok(())
}

/// Empties the cart.
#[allow(clippy::print_stdout)]
pub async fn clear(session: &mut Session) {
    session.cart_mut().clear().await;
    println!("Cart cleared.");
}

/// Pushes local-only entries into the account cart.
#[allow(clippy::print_stdout)]
pub async fn sync(session: &mut Session) {
    session.prepare_checkout().await;
    let cart = session.cart();
    if cart.state().is_authenticated() && !cart.state().is_degraded() {
        println!("Cart synced with account.");
    } else {
        println!("Cart kept locally ({}).", cart.state().label());
    }
    print_snapshot(cart.snapshot());
}

#[allow(clippy::print_stdout)]
fn print_snapshot(snapshot: &CartSnapshot) {
    if snapshot.is_empty() {
        println!("Cart is empty.");
        return;
    }

    println!("{:<14} {:<32} {:>4} {:>12} {:>12}", "SKU", "NAME", "QTY", "UNIT", "TOTAL");
    for entry in snapshot.entries() {
        let unit = entry.product.unit_price();
        let line = unit.times(entry.quantity);
        println!(
            "{:<14} {:<32} {:>4} {:>12} {:>12}",
            entry.product.sku,
            entry.product.name,
            entry.quantity,
            unit.display(),
            line.display(),
        );
    }
    println!(
        "{} items, {} total",
        snapshot.total_items(),
        snapshot.total_price().display()
    );
}
