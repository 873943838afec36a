//! Lumira CLI - command-line shopping client.
//!
//! Drives a cart/wishlist session against the storefront backend. With
//! `LUMIRA_ACCESS_TOKEN` set the session is authenticated and operates on
//! the account collections; without it the session is anonymous and every
//! mutation lands in the local cache, ready to merge on the next
//! authenticated run.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! lumira cart show
//!
//! # Add two of a product (fetched from the catalog by ID)
//! lumira cart add 7b3c1c2e-8a6e-4b5e-9d39-0f5b8f6f2a11 -q 2
//!
//! # Change a line quantity (0 removes the line)
//! lumira cart set-qty 7b3c1c2e-8a6e-4b5e-9d39-0f5b8f6f2a11 5
//!
//! # Push local-only entries to the account cart before checkout
//! lumira cart sync
//!
//! # Wishlist operations
//! lumira wishlist toggle 7b3c1c2e-8a6e-4b5e-9d39-0f5b8f6f2a11
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use lumira_shop::api::HttpApi;
use lumira_shop::cache::FileStore;
use lumira_shop::config::ShopConfig;
use lumira_shop::{AccessToken, ShopContext};

mod commands;

use commands::CliError;

/// The production session type the CLI drives.
type Session = ShopContext<HttpApi, FileStore>;

#[derive(Parser)]
#[command(name = "lumira")]
#[command(author, version, about = "Lumira storefront shopping client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shopping cart operations
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Wishlist operations
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the current cart
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID (UUID)
        product_id: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity for a cart line (0 removes it)
    SetQty {
        /// Product ID (UUID)
        product_id: String,

        /// New quantity
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID (UUID)
        product_id: String,
    },
    /// Empty the cart
    Clear,
    /// Push local-only entries to the account cart (pre-checkout)
    Sync,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show the current wishlist
    Show,
    /// Add a product to the wishlist
    Add {
        /// Product ID (UUID)
        product_id: String,
    },
    /// Remove a product from the wishlist
    Remove {
        /// Product ID (UUID)
        product_id: String,
    },
    /// Add the product if absent, remove it if saved
    Toggle {
        /// Product ID (UUID)
        product_id: String,
    },
    /// Empty the wishlist
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing; default to warnings so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lumira=warn,lumira_shop=warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ShopConfig::from_env()?;
    let api = HttpApi::new(&config)?;
    let store = FileStore::open(&config.cache_dir)?;

    let mut session: Session = ShopContext::new(api.clone(), store);
    let token = config.access_token.map(AccessToken::from);
    session.start(token).await;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&session),
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&mut session, &api, &product_id, quantity).await?,
            CartAction::SetQty {
                product_id,
                quantity,
            } => commands::cart::set_quantity(&mut session, &product_id, quantity).await?,
            CartAction::Remove { product_id } => {
                commands::cart::remove(&mut session, &product_id).await?;
            }
            CartAction::Clear => commands::cart::clear(&mut session).await,
            CartAction::Sync => commands::cart::sync(&mut session).await,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(&session),
            WishlistAction::Add { product_id } => {
                commands::wishlist::add(&mut session, &api, &product_id).await?;
            }
            WishlistAction::Remove { product_id } => {
                commands::wishlist::remove(&mut session, &product_id).await?;
            }
            WishlistAction::Toggle { product_id } => {
                commands::wishlist::toggle(&mut session, &api, &product_id).await?;
            }
            WishlistAction::Clear => commands::wishlist::clear(&mut session).await,
        },
    }

    Ok(())
}
